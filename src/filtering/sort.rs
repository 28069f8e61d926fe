use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::FilterConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::metamodel::Metamodel;

use super::pagination::PageRequest;
use super::path::{ResolvedAttribute, is_valid_field_name, resolve};

const SORT_FIELD: &str = "sortBy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `asc` (any case, surrounding whitespace ignored) sorts ascending,
    /// anything else sorts descending.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("ASC"),
            Self::Desc => f.write_str("DESC"),
        }
    }
}

/// One ordering term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub attribute: ResolvedAttribute,
    pub direction: SortDirection,
    /// Compare lower-cased text instead of raw text
    pub ignore_case: bool,
}

impl SortKey {
    #[must_use]
    pub fn new(attribute: ResolvedAttribute, direction: SortDirection) -> Self {
        Self {
            ignore_case: attribute.value_type.is_textual(),
            attribute,
            direction,
        }
    }
}

fn resolve_sort_field(
    metamodel: &Metamodel,
    entity: &str,
    field: &str,
    config: &FilterConfig,
) -> Option<ResolvedAttribute> {
    if !is_valid_field_name(field, config.max_field_length) {
        return None;
    }
    resolve(metamodel, entity, field).ok()
}

/// Ordering for a listing request.
///
/// The requested field comes first. When it does not resolve on `entity`,
/// the configured default sort field is used instead (or the primary key
/// when that does not resolve either) and a note is returned. The primary
/// key is appended in the same direction so pages are deterministic.
#[must_use]
pub fn resolve_sort(
    metamodel: &Metamodel,
    entity: &str,
    request: &PageRequest,
    config: &FilterConfig,
) -> (Vec<SortKey>, Option<Diagnostic>) {
    let primary_key = metamodel
        .entity(entity)
        .and_then(|meta| resolve(metamodel, entity, &meta.primary_key).ok());

    let mut note = None;
    let main = match resolve_sort_field(metamodel, entity, &request.sort_by, config) {
        Some(attribute) => Some(attribute),
        None => {
            let fallback = resolve_sort_field(metamodel, entity, &config.default_sort_by, config)
                .or_else(|| primary_key.clone());
            let fallback_name = fallback
                .as_ref()
                .map_or_else(String::new, ResolvedAttribute::full_path);
            debug!(
                entity,
                requested = %request.sort_by,
                fallback = %fallback_name,
                "Unknown sort field, using fallback"
            );
            note = Some(Diagnostic::global(
                SORT_FIELD,
                DiagnosticKind::UnknownSortField {
                    requested: request.sort_by.clone(),
                    fallback: fallback_name,
                },
            ));
            fallback
        }
    };

    let mut keys: Vec<SortKey> = main
        .into_iter()
        .map(|attribute| SortKey::new(attribute, request.direction))
        .collect();
    if let Some(pk) = primary_key {
        if keys.iter().all(|key| key.attribute != pk) {
            keys.push(SortKey::new(pk, request.direction));
        }
    }
    (keys, note)
}
