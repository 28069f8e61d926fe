//! Composition of every criterion and the global search into one predicate.
//!
//! Each criterion is resolved and built independently. A criterion that fails
//! (unknown field, unconvertible value, operator/type mismatch, ...) is left
//! out and reported; the remaining criteria still apply. Leaving a criterion
//! out is the same as never having supplied it, because [`Predicate::and`]
//! drops the neutral `True`.

use tracing::{debug, warn};

use crate::config::FilterConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::metamodel::Metamodel;
use crate::models::{FilterCriterion, FilterSpecification};

use super::conditions::build_criterion;
use super::path::{is_valid_field_name, resolve};
use super::predicate::Predicate;
use super::search::build_global_search;

const GLOBAL_SEARCH_FIELD: &str = "globalSearch";

/// Predicate for a whole specification, plus what could not be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub predicate: Predicate,
    pub diagnostics: Diagnostics,
}

/// Resolve the criterion's field on `entity` and build its predicate.
///
/// # Errors
///
/// Returns the reason the criterion cannot be applied.
pub fn build_filter(
    metamodel: &Metamodel,
    entity: &str,
    criterion: &FilterCriterion,
    config: &FilterConfig,
) -> Result<Predicate, DiagnosticKind> {
    let field = criterion.field.as_str();
    if field.trim().is_empty() {
        return Err(DiagnosticKind::EmptyField);
    }
    if !is_valid_field_name(field, config.max_field_length) {
        return Err(DiagnosticKind::InvalidFieldName);
    }
    let attribute = resolve(metamodel, entity, field).map_err(DiagnosticKind::UnresolvedField)?;
    build_criterion(&attribute, criterion, config)
}

/// `AND(criterion_1, ..., criterion_n, global_search)` over `entity`.
///
/// Never fails: with nothing applicable the predicate is `Predicate::True`
/// and every record matches.
#[must_use]
pub fn build_specification(
    metamodel: &Metamodel,
    entity: &str,
    spec: &FilterSpecification,
    config: &FilterConfig,
) -> FilterOutcome {
    let mut diagnostics = Diagnostics::new();
    let mut parts = Vec::with_capacity(spec.filters.len() + 1);

    for (index, criterion) in spec.filters.iter().enumerate() {
        match build_filter(metamodel, entity, criterion, config) {
            Ok(predicate) => {
                if predicate.is_empty_membership() {
                    debug!(
                        entity,
                        field = %criterion.field,
                        operator = %criterion.operator,
                        "No list value converted, membership test is empty"
                    );
                    diagnostics.push(Diagnostic::criterion(
                        index,
                        &criterion.field,
                        DiagnosticKind::EmptyMembership,
                    ));
                }
                parts.push(predicate);
            }
            Err(kind) => {
                warn!(
                    entity,
                    index,
                    field = %criterion.field,
                    operator = %criterion.operator,
                    reason = %kind,
                    "Ignoring filter criterion"
                );
                diagnostics.push(Diagnostic::criterion(index, &criterion.field, kind));
            }
        }
    }

    if let Some(term) = spec
        .global_search
        .as_deref()
        .filter(|term| !term.trim().is_empty())
    {
        match build_global_search(metamodel, entity, term, config) {
            Ok(predicate) => {
                if predicate == Predicate::False {
                    debug!(entity, "Global search has no attribute to match against");
                    diagnostics.push(Diagnostic::global(
                        GLOBAL_SEARCH_FIELD,
                        DiagnosticKind::NoSearchableAttributes,
                    ));
                }
                parts.push(predicate);
            }
            Err(kind) => {
                warn!(entity, reason = %kind, "Ignoring global search");
                diagnostics.push(Diagnostic::global(GLOBAL_SEARCH_FIELD, kind));
            }
        }
    }

    FilterOutcome {
        predicate: Predicate::and(parts),
        diagnostics,
    }
}
