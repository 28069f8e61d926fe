use crate::config::FilterConfig;
use crate::diagnostics::DiagnosticKind;
use crate::metamodel::Metamodel;

use super::path::{ResolveError, ResolvedAttribute};
use super::predicate::{MatchMode, Predicate};

/// Make `%` and `_` in user text match literally under `LIKE ... ESCAPE '\'`.
#[must_use]
pub fn escape_like_wildcards(input: &str) -> String {
    // backslash first, it is the escape character itself
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Normalize a raw search term: trimmed, bounded in length, lower-cased.
#[must_use]
pub fn normalize_search_term(term: &str, max_length: usize) -> String {
    term.trim().chars().take(max_length).collect::<String>().to_lowercase()
}

/// Build the global search predicate for `entity`.
///
/// Every exposed, searchable string attribute of the root entity contributes
/// a case-insensitive contains match; the matches are ORed. Associations are
/// not searched. A blank term yields `Predicate::True`; an entity without any
/// searchable attribute yields `Predicate::False` (the empty disjunction).
///
/// # Errors
///
/// Returns [`DiagnosticKind::SearchUnavailable`] when `entity` is not in the
/// metamodel.
pub fn build_global_search(
    metamodel: &Metamodel,
    entity: &str,
    term: &str,
    config: &FilterConfig,
) -> Result<Predicate, DiagnosticKind> {
    let meta = metamodel.entity(entity).ok_or_else(|| {
        DiagnosticKind::SearchUnavailable(ResolveError::UnknownEntity(entity.to_string()))
    })?;

    let needle = normalize_search_term(term, config.max_search_length);
    if needle.is_empty() {
        return Ok(Predicate::True);
    }

    Ok(Predicate::or(meta.searchable_attributes().filter_map(|def| {
        let value_type = def.value_type()?.clone();
        Some(Predicate::Match {
            attribute: ResolvedAttribute {
                path: Vec::new(),
                name: def.name.clone(),
                column: def.column.clone(),
                value_type,
                joins: Vec::new(),
            },
            mode: MatchMode::Contains,
            needle: needle.clone(),
        })
    })))
}
