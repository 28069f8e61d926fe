use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use std::str::FromStr;
use tracing::warn;
use utoipa::ToSchema;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};

/// Comparison operator applied by a single [`FilterCriterion`].
///
/// Serialized in `SCREAMING_SNAKE_CASE`, e.g. `"GREATER_THAN_OR_EQUAL"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    #[default]
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Between,
    In,
    NotIn,
    IsNull,
    IsNotNull,
    IsTrue,
    IsFalse,
}

impl Operator {
    pub const ALL: [Self; 17] = [
        Self::Equals,
        Self::NotEquals,
        Self::Contains,
        Self::NotContains,
        Self::StartsWith,
        Self::EndsWith,
        Self::GreaterThan,
        Self::GreaterThanOrEqual,
        Self::LessThan,
        Self::LessThanOrEqual,
        Self::Between,
        Self::In,
        Self::NotIn,
        Self::IsNull,
        Self::IsNotNull,
        Self::IsTrue,
        Self::IsFalse,
    ];

    /// Wire name of the operator
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::Contains => "CONTAINS",
            Self::NotContains => "NOT_CONTAINS",
            Self::StartsWith => "STARTS_WITH",
            Self::EndsWith => "ENDS_WITH",
            Self::GreaterThan => "GREATER_THAN",
            Self::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            Self::LessThan => "LESS_THAN",
            Self::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            Self::Between => "BETWEEN",
            Self::In => "IN",
            Self::NotIn => "NOT_IN",
            Self::IsNull => "IS_NULL",
            Self::IsNotNull => "IS_NOT_NULL",
            Self::IsTrue => "IS_TRUE",
            Self::IsFalse => "IS_FALSE",
        }
    }

    /// Whether the operator needs a `value` to build a predicate.
    #[must_use]
    pub const fn requires_value(self) -> bool {
        !matches!(
            self,
            Self::IsNull | Self::IsNotNull | Self::IsTrue | Self::IsFalse
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an operator name is not one of the seventeen known operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown filter operator '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

fn deserialize_operator<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Operator, D::Error> {
    Option::<String>::deserialize(deserializer)?
        .map_or(Ok(Operator::default()), |name| name.parse().map_err(de::Error::custom))
}

/// One `(field, operator, value, value2)` filter request.
///
/// `field` is an attribute name, optionally dotted to reach through to-one
/// associations (`"customer.lastName"`). `value2` is only read by `BETWEEN`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriterion {
    #[schema(example = "customer.lastName")]
    pub field: String,
    /// `EQUALS` when absent or `null`; names are matched case-insensitively.
    #[serde(default, deserialize_with = "deserialize_operator")]
    pub operator: Operator,
    #[serde(default)]
    #[schema(example = "doe")]
    pub value: Option<String>,
    #[serde(default)]
    pub value2: Option<String>,
}

impl FilterCriterion {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: Some(value.into()),
            value2: None,
        }
    }

    /// Criterion for the value-less operators (`IS_NULL`, `IS_TRUE`, ...).
    pub fn unary(field: impl Into<String>, operator: Operator) -> Self {
        Self {
            field: field.into(),
            operator,
            value: None,
            value2: None,
        }
    }

    /// Inclusive `BETWEEN low AND high` criterion.
    pub fn between(
        field: impl Into<String>,
        low: impl Into<String>,
        high: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Between,
            value: Some(low.into()),
            value2: Some(high.into()),
        }
    }
}

/// Complete listing request: criteria, global search, pagination and sorting.
///
/// Absent pagination and sort fields fall back to the configured defaults
/// (`page=0`, `size=10`, `sortBy="id"`, `sortDirection="desc"` out of the box).
///
/// ```json
/// {
///   "filters": [
///     {"field": "price", "operator": "BETWEEN", "value": "10", "value2": "20"},
///     {"field": "customer.lastName", "operator": "STARTS_WITH", "value": "do"}
///   ],
///   "globalSearch": "laptop",
///   "page": 0,
///   "size": 25,
///   "sortBy": "createdAt",
///   "sortDirection": "asc"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpecification {
    /// Criteria, combined with AND.
    pub filters: Vec<FilterCriterion>,
    /// Case-insensitive term matched against every searchable text attribute.
    #[schema(example = "laptop")]
    pub global_search: Option<String>,
    /// Zero-based page index.
    #[schema(example = 0)]
    pub page: Option<i64>,
    /// Page size, at least 1.
    #[schema(example = 10)]
    pub size: Option<i64>,
    /// Attribute to sort by; dotted paths are allowed.
    #[schema(example = "id")]
    pub sort_by: Option<String>,
    /// `asc` or `desc`, case-insensitive. Anything but `asc` sorts descending.
    #[schema(example = "desc")]
    pub sort_direction: Option<String>,
}

impl FilterSpecification {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_filter(mut self, criterion: FilterCriterion) -> Self {
        self.filters.push(criterion);
        self
    }

    #[must_use]
    pub fn with_global_search(mut self, term: impl Into<String>) -> Self {
        self.global_search = Some(term.into());
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort_by: impl Into<String>, direction: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_direction = Some(direction.into());
        self
    }

    /// Parse a JSON-encoded specification, falling back to the default
    /// (unfiltered) specification when the input is missing or malformed.
    ///
    /// Criteria are decoded one at a time: a malformed criterion is logged
    /// and skipped while the others are kept.
    #[must_use]
    pub fn from_json_lenient(json: Option<&str>) -> Self {
        Self::from_json_with_diagnostics(json).0
    }

    /// Like [`from_json_lenient`](Self::from_json_lenient), also returning a
    /// `MalformedCriterion` diagnostic for every criterion that was skipped.
    #[must_use]
    pub fn from_json_with_diagnostics(json: Option<&str>) -> (Self, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let Some(raw) = json else {
            return (Self::default(), diagnostics);
        };

        let mut document = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Object(document)) => document,
            Ok(_) => {
                warn!("Filter specification is not a JSON object, ignoring it");
                return (Self::default(), diagnostics);
            }
            Err(e) => {
                warn!(error = %e, "Invalid JSON in filter specification, ignoring it");
                return (Self::default(), diagnostics);
            }
        };

        let filters = document.remove("filters");
        let mut spec: Self = serde_json::from_value(serde_json::Value::Object(document))
            .unwrap_or_else(|e| {
                warn!(error = %e, "Invalid paging or search parameters, using defaults");
                Self::default()
            });

        match filters {
            Some(serde_json::Value::Array(items)) => {
                for (position, item) in items.into_iter().enumerate() {
                    let field = item
                        .get("field")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    match serde_json::from_value::<FilterCriterion>(item) {
                        Ok(criterion) => spec.filters.push(criterion),
                        Err(e) => {
                            warn!(
                                position,
                                field = %field,
                                error = %e,
                                "Ignoring malformed filter criterion"
                            );
                            diagnostics.push(Diagnostic::global(
                                field,
                                DiagnosticKind::MalformedCriterion {
                                    position,
                                    reason: e.to_string(),
                                },
                            ));
                        }
                    }
                }
            }
            None | Some(serde_json::Value::Null) => {}
            Some(_) => warn!("Filter specification 'filters' is not an array, ignoring it"),
        }

        (spec, diagnostics)
    }

    /// True when the specification carries no criteria and no global search.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.filters.is_empty()
            && self
                .global_search
                .as_deref()
                .is_none_or(|term| term.trim().is_empty())
    }
}
