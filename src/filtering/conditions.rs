//! One filter criterion to one predicate.

use crate::config::FilterConfig;
use crate::diagnostics::DiagnosticKind;
use crate::metamodel::ValueType;
use crate::models::{FilterCriterion, Operator};

use super::coerce::{Value, coerce};
use super::path::ResolvedAttribute;
use super::predicate::{Comparison, MatchMode, Predicate};

/// Basic value length check
fn validate_field_value(value: &str, config: &FilterConfig) -> Result<(), DiagnosticKind> {
    let length = value.chars().count();
    if length > config.max_value_length {
        return Err(DiagnosticKind::ValueTooLong {
            length,
            max: config.max_value_length,
        });
    }
    Ok(())
}

/// Non-blank, bounded `value`, or the reason there is none.
fn required_value<'a>(
    value: Option<&'a str>,
    config: &FilterConfig,
) -> Result<&'a str, DiagnosticKind> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or(DiagnosticKind::MissingValue)?;
    validate_field_value(value, config)?;
    Ok(value)
}

fn mismatch(operator: Operator, value_type: &ValueType) -> DiagnosticKind {
    DiagnosticKind::OperatorTypeMismatch {
        operator: operator.to_string(),
        value_type: value_type.to_string(),
    }
}

fn coerce_or_fail(raw: &str, value_type: &ValueType) -> Result<Value, DiagnosticKind> {
    coerce(raw, value_type).ok_or_else(|| DiagnosticKind::CoercionFailed {
        value: raw.to_string(),
        expected: value_type.to_string(),
    })
}

fn compare(attribute: &ResolvedAttribute, op: Comparison, value: Value) -> Predicate {
    Predicate::Compare {
        attribute: attribute.clone(),
        op,
        value,
    }
}

fn text_match(attribute: &ResolvedAttribute, mode: MatchMode, raw: &str) -> Predicate {
    Predicate::Match {
        attribute: attribute.clone(),
        mode,
        needle: raw.to_lowercase(),
    }
}

/// Comma-separated list, trimmed, with every token that does not coerce discarded.
fn membership(attribute: &ResolvedAttribute, raw: &str) -> Predicate {
    let values = raw
        .split(',')
        .map(str::trim)
        .filter_map(|token| coerce(token, &attribute.value_type))
        .collect();
    Predicate::In {
        attribute: attribute.clone(),
        values,
    }
}

/// Build the predicate for `criterion` applied to an already resolved attribute.
///
/// # Errors
///
/// Returns the [`DiagnosticKind`] explaining why the criterion cannot be
/// applied: missing or oversized value, a value that does not convert to the
/// attribute's type, or an operator that makes no sense for that type. The
/// caller leaves the criterion out of the query.
pub fn build_criterion(
    attribute: &ResolvedAttribute,
    criterion: &FilterCriterion,
    config: &FilterConfig,
) -> Result<Predicate, DiagnosticKind> {
    let operator = criterion.operator;
    let value_type = &attribute.value_type;

    let raw = || required_value(criterion.value.as_deref(), config);

    match operator {
        Operator::IsNull => Ok(Predicate::IsNull(attribute.clone())),
        Operator::IsNotNull => Ok(!Predicate::IsNull(attribute.clone())),
        Operator::IsTrue | Operator::IsFalse => {
            if *value_type != ValueType::Boolean {
                return Err(mismatch(operator, value_type));
            }
            let flag = operator == Operator::IsTrue;
            Ok(compare(attribute, Comparison::Eq, Value::Boolean(flag)))
        }
        Operator::Equals | Operator::NotEquals => {
            let value = coerce_or_fail(raw()?, value_type)?;
            let op = if operator == Operator::Equals {
                Comparison::Eq
            } else {
                Comparison::Ne
            };
            Ok(compare(attribute, op, value))
        }
        Operator::Contains | Operator::NotContains | Operator::StartsWith | Operator::EndsWith => {
            let raw = raw()?;
            if !value_type.is_textual() {
                return Err(mismatch(operator, value_type));
            }
            Ok(match operator {
                Operator::Contains => text_match(attribute, MatchMode::Contains, raw),
                Operator::NotContains => !text_match(attribute, MatchMode::Contains, raw),
                Operator::StartsWith => text_match(attribute, MatchMode::StartsWith, raw),
                _ => text_match(attribute, MatchMode::EndsWith, raw),
            })
        }
        Operator::GreaterThan
        | Operator::GreaterThanOrEqual
        | Operator::LessThan
        | Operator::LessThanOrEqual => {
            let raw = raw()?;
            if !value_type.is_orderable() {
                return Err(mismatch(operator, value_type));
            }
            let op = match operator {
                Operator::GreaterThan => Comparison::Gt,
                Operator::GreaterThanOrEqual => Comparison::Ge,
                Operator::LessThan => Comparison::Lt,
                _ => Comparison::Le,
            };
            Ok(compare(attribute, op, coerce_or_fail(raw, value_type)?))
        }
        Operator::Between => {
            let raw_low = raw()?;
            if !value_type.is_orderable() {
                return Err(mismatch(operator, value_type));
            }
            let raw_high = required_value(criterion.value2.as_deref(), config).map_err(|e| {
                if e == DiagnosticKind::MissingValue {
                    DiagnosticKind::MissingUpperBound
                } else {
                    e
                }
            })?;
            Ok(Predicate::Between {
                attribute: attribute.clone(),
                low: coerce_or_fail(raw_low, value_type)?,
                high: coerce_or_fail(raw_high, value_type)?,
            })
        }
        Operator::In => Ok(membership(attribute, raw()?)),
        Operator::NotIn => Ok(!membership(attribute, raw()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metamodel::EnumType;
    use rust_decimal::Decimal;

    fn attr(name: &str, value_type: ValueType) -> ResolvedAttribute {
        ResolvedAttribute {
            path: Vec::new(),
            name: name.to_string(),
            column: name.to_string(),
            value_type,
            joins: Vec::new(),
        }
    }

    fn build(
        attribute: &ResolvedAttribute,
        criterion: &FilterCriterion,
    ) -> Result<Predicate, DiagnosticKind> {
        build_criterion(attribute, criterion, &FilterConfig::default())
    }

    #[test]
    fn test_equals_coerces_to_attribute_type() {
        let age = attr("age", ValueType::Integer);
        assert_eq!(
            build(&age, &FilterCriterion::new("age", Operator::Equals, "42")),
            Ok(Predicate::Compare {
                attribute: age.clone(),
                op: Comparison::Eq,
                value: Value::Integer(42)
            })
        );
        assert_eq!(
            build(&age, &FilterCriterion::new("age", Operator::Equals, "abc")),
            Err(DiagnosticKind::CoercionFailed {
                value: "abc".into(),
                expected: "integer".into()
            })
        );
    }

    #[test]
    fn test_missing_and_blank_values() {
        let age = attr("age", ValueType::Integer);
        let mut criterion = FilterCriterion::unary("age", Operator::GreaterThan);
        assert_eq!(build(&age, &criterion), Err(DiagnosticKind::MissingValue));
        criterion.value = Some("  ".into());
        assert_eq!(build(&age, &criterion), Err(DiagnosticKind::MissingValue));
    }

    #[test]
    fn test_value_length_limit() {
        let name = attr("name", ValueType::String);
        let config = FilterConfig {
            max_value_length: 5,
            ..FilterConfig::default()
        };
        let criterion = FilterCriterion::new("name", Operator::Contains, "abcdef");
        assert_eq!(
            build_criterion(&name, &criterion, &config),
            Err(DiagnosticKind::ValueTooLong { length: 6, max: 5 })
        );
    }

    #[test]
    fn test_contains_family_lowercases_needle() {
        let name = attr("name", ValueType::String);
        assert_eq!(
            build(&name, &FilterCriterion::new("name", Operator::Contains, "LaP")),
            Ok(Predicate::Match {
                attribute: name.clone(),
                mode: MatchMode::Contains,
                needle: "lap".into()
            })
        );
        assert!(matches!(
            build(&name, &FilterCriterion::new("name", Operator::NotContains, "x")),
            Ok(Predicate::Not(_))
        ));
        assert!(matches!(
            build(&name, &FilterCriterion::new("name", Operator::EndsWith, "x")),
            Ok(Predicate::Match { mode: MatchMode::EndsWith, .. })
        ));
    }

    #[test]
    fn test_contains_on_non_string_is_mismatch() {
        let age = attr("age", ValueType::Integer);
        assert!(matches!(
            build(&age, &FilterCriterion::new("age", Operator::StartsWith, "4")),
            Err(DiagnosticKind::OperatorTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_ordering_requires_orderable_type() {
        let active = attr("active", ValueType::Boolean);
        assert!(matches!(
            build(&active, &FilterCriterion::new("active", Operator::GreaterThan, "true")),
            Err(DiagnosticKind::OperatorTypeMismatch { .. })
        ));
        let status = attr("status", ValueType::Enum(EnumType::new("Status", ["A", "B"])));
        assert!(matches!(
            build(&status, &FilterCriterion::between("status", "A", "B")),
            Err(DiagnosticKind::OperatorTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_between_needs_both_bounds() {
        let price = attr("price", ValueType::Decimal);
        assert_eq!(
            build(&price, &FilterCriterion::between("price", "10", "20")),
            Ok(Predicate::Between {
                attribute: price.clone(),
                low: Value::Decimal(Decimal::from(10)),
                high: Value::Decimal(Decimal::from(20)),
            })
        );
        assert_eq!(
            build(&price, &FilterCriterion::new("price", Operator::Between, "10")),
            Err(DiagnosticKind::MissingUpperBound)
        );
        assert!(matches!(
            build(&price, &FilterCriterion::between("price", "10", "lots")),
            Err(DiagnosticKind::CoercionFailed { value, .. }) if value == "lots"
        ));
    }

    #[test]
    fn test_in_discards_bad_tokens() {
        let id = attr("id", ValueType::Long);
        assert_eq!(
            build(&id, &FilterCriterion::new("id", Operator::In, "1, 2,x,,")),
            Ok(Predicate::In {
                attribute: id.clone(),
                values: vec![Value::Long(1), Value::Long(2)]
            })
        );
        let empty = build(&id, &FilterCriterion::new("id", Operator::NotIn, "x,y")).unwrap();
        assert!(empty.is_empty_membership());
        assert!(matches!(empty, Predicate::Not(_)));
    }

    #[test]
    fn test_null_operators_ignore_value() {
        let email = attr("email", ValueType::String);
        assert_eq!(
            build(&email, &FilterCriterion::new("email", Operator::IsNull, "ignored")),
            Ok(Predicate::IsNull(email.clone()))
        );
        assert_eq!(
            build(&email, &FilterCriterion::unary("email", Operator::IsNotNull)),
            Ok(!Predicate::IsNull(email.clone()))
        );
    }

    #[test]
    fn test_boolean_operators() {
        let active = attr("active", ValueType::Boolean);
        assert_eq!(
            build(&active, &FilterCriterion::unary("active", Operator::IsFalse)),
            Ok(Predicate::Compare {
                attribute: active.clone(),
                op: Comparison::Eq,
                value: Value::Boolean(false)
            })
        );
        let name = attr("name", ValueType::String);
        assert!(matches!(
            build(&name, &FilterCriterion::unary("name", Operator::IsTrue)),
            Err(DiagnosticKind::OperatorTypeMismatch { .. })
        ));
    }
}
