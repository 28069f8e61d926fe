//! # Filter diagnostics
//!
//! Malformed filter input never fails a listing request. A criterion that
//! cannot be applied is left out of the predicate and reported here instead,
//! next to notes about criteria that *were* applied but behave in a way the
//! caller may not expect (an `IN` list whose every token was rejected, for
//! instance).
//!
//! Every diagnostic is also logged through `tracing` where it is produced, so
//! callers that ignore the returned list still leave a trace in the logs.

use std::fmt;

use serde::Serialize;

use crate::filtering::path::ResolveError;

/// Why a criterion, the global search or the sort field was not applied as asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    EmptyField,
    /// Rejected by field name validation before resolution
    InvalidFieldName,
    UnresolvedField(ResolveError),
    MissingValue,
    ValueTooLong { length: usize, max: usize },
    CoercionFailed { value: String, expected: String },
    OperatorTypeMismatch { operator: String, value_type: String },
    /// `BETWEEN` without a usable `value2`
    MissingUpperBound,
    /// Note: every `IN`/`NOT_IN` token was rejected; the predicate is vacuous
    EmptyMembership,
    /// Note: the entity has no searchable text attribute, search matches nothing
    NoSearchableAttributes,
    SearchUnavailable(ResolveError),
    /// Note: the sort field did not resolve; the default sort was used
    UnknownSortField { requested: String, fallback: String },
    /// The criterion at `position` of the request's `filters` array could not be decoded
    MalformedCriterion { position: usize, reason: String },
}

impl DiagnosticKind {
    /// Whether the thing reported on was left out of the query.
    ///
    /// Notes (`EmptyMembership`, `NoSearchableAttributes`, `UnknownSortField`)
    /// describe a predicate or ordering that was still applied.
    #[must_use]
    pub const fn drops_criterion(&self) -> bool {
        !matches!(
            self,
            Self::EmptyMembership | Self::NoSearchableAttributes | Self::UnknownSortField { .. }
        )
    }

    /// Stable machine-readable code, used when serializing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyField => "EMPTY_FIELD",
            Self::InvalidFieldName => "INVALID_FIELD_NAME",
            Self::UnresolvedField(_) => "UNRESOLVED_FIELD",
            Self::MissingValue => "MISSING_VALUE",
            Self::ValueTooLong { .. } => "VALUE_TOO_LONG",
            Self::CoercionFailed { .. } => "COERCION_FAILED",
            Self::OperatorTypeMismatch { .. } => "OPERATOR_TYPE_MISMATCH",
            Self::MissingUpperBound => "MISSING_UPPER_BOUND",
            Self::EmptyMembership => "EMPTY_MEMBERSHIP",
            Self::NoSearchableAttributes => "NO_SEARCHABLE_ATTRIBUTES",
            Self::SearchUnavailable(_) => "SEARCH_UNAVAILABLE",
            Self::UnknownSortField { .. } => "UNKNOWN_SORT_FIELD",
            Self::MalformedCriterion { .. } => "MALFORMED_CRITERION",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField => f.write_str("field name is empty"),
            Self::InvalidFieldName => f.write_str("field name is not valid"),
            Self::UnresolvedField(e) => write!(f, "{e}"),
            Self::MissingValue => f.write_str("operator requires a value"),
            Self::ValueTooLong { length, max } => {
                write!(f, "value is {length} characters long, the maximum is {max}")
            }
            Self::CoercionFailed { value, expected } => {
                write!(f, "cannot convert '{value}' to {expected}")
            }
            Self::OperatorTypeMismatch {
                operator,
                value_type,
            } => write!(f, "operator {operator} does not apply to {value_type} attributes"),
            Self::MissingUpperBound => f.write_str("BETWEEN requires value2"),
            Self::EmptyMembership => {
                f.write_str("no list value could be converted, membership test is empty")
            }
            Self::NoSearchableAttributes => {
                f.write_str("entity has no searchable text attributes, search matches nothing")
            }
            Self::SearchUnavailable(e) => write!(f, "global search unavailable: {e}"),
            Self::UnknownSortField {
                requested,
                fallback,
            } => write!(f, "cannot sort by '{requested}', sorting by '{fallback}' instead"),
            Self::MalformedCriterion { position, reason } => {
                write!(f, "filter #{position} is malformed: {reason}")
            }
        }
    }
}

/// One diagnostic, tied to the criterion (by position) or field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Position in `FilterSpecification::filters`; `None` for search and sort
    pub index: Option<usize>,
    pub field: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn criterion(index: usize, field: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            index: Some(index),
            field: field.into(),
            kind,
        }
    }

    pub fn global(field: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            index: None,
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "filter #{index} on '{}': {}", self.field, self.kind),
            None => write!(f, "{}: {}", self.field, self.kind),
        }
    }
}

/// Serialized as `{"index": 0, "field": "price", "code": "COERCION_FAILED", "message": "..."}`
impl Serialize for Diagnostic {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Diagnostic", 4)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("field", &self.field)?;
        state.serialize_field("code", self.kind.code())?;
        state.serialize_field("message", &self.kind.to_string())?;
        state.end()
    }
}

/// Ordered list of diagnostics produced while preparing one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Diagnostics whose criterion was left out of the predicate.
    pub fn dropped(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.kind.drops_criterion())
    }

    /// Diagnostics reported for the criterion at `index`.
    pub fn for_criterion(&self, index: usize) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(move |d| d.index == Some(index))
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
