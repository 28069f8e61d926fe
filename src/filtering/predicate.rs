//! Backend-agnostic predicate tree.
//!
//! The composer builds a [`Predicate`]; backends translate it at the
//! boundary (`backend::sql` into a Sea-ORM `Condition`, `backend::memory`
//! into a record evaluator). Nothing here knows about SQL.

use std::fmt;
use std::ops::Not;

use super::coerce::Value;
use super::path::ResolvedAttribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

/// Case-insensitive text match flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    Contains,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every record; the neutral element of `And`
    True,
    /// Matches no record; the neutral element of `Or`
    False,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    Compare {
        attribute: ResolvedAttribute,
        op: Comparison,
        value: Value,
    },
    /// Inclusive on both ends
    Between {
        attribute: ResolvedAttribute,
        low: Value,
        high: Value,
    },
    /// Membership; an empty list matches nothing
    In {
        attribute: ResolvedAttribute,
        values: Vec<Value>,
    },
    IsNull(ResolvedAttribute),
    /// `needle` is stored lower-cased and compared against the lower-cased attribute
    Match {
        attribute: ResolvedAttribute,
        mode: MatchMode,
        needle: String,
    },
}

impl Predicate {
    /// Conjunction that flattens nested `And`s and drops `True` operands.
    ///
    /// Dropping the neutral element keeps "criterion skipped" and "criterion
    /// never supplied" structurally identical.
    pub fn and<I: IntoIterator<Item = Predicate>>(items: I) -> Self {
        let mut operands = Vec::new();
        for item in items {
            match item {
                Self::True => {}
                Self::And(inner) => operands.extend(inner),
                other => operands.push(other),
            }
        }
        match operands.len() {
            0 => Self::True,
            1 => operands.remove(0),
            _ => Self::And(operands),
        }
    }

    /// Disjunction that flattens nested `Or`s and drops `False` operands.
    /// With no operands left the disjunction is vacuous and matches nothing.
    pub fn or<I: IntoIterator<Item = Predicate>>(items: I) -> Self {
        let mut operands = Vec::new();
        for item in items {
            match item {
                Self::False => {}
                Self::Or(inner) => operands.extend(inner),
                other => operands.push(other),
            }
        }
        match operands.len() {
            0 => Self::False,
            1 => operands.remove(0),
            _ => Self::Or(operands),
        }
    }

    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::True)
    }

    /// `IN ()` or `NOT IN ()`: a membership test left without any value.
    #[must_use]
    pub fn is_empty_membership(&self) -> bool {
        match self {
            Self::In { values, .. } => values.is_empty(),
            Self::Not(inner) => inner.is_empty_membership(),
            _ => false,
        }
    }

    /// Every attribute referenced anywhere in the tree, in traversal order.
    #[must_use]
    pub fn attributes(&self) -> Vec<&ResolvedAttribute> {
        let mut out = Vec::new();
        self.collect_attributes(&mut out);
        out
    }

    fn collect_attributes<'a>(&'a self, out: &mut Vec<&'a ResolvedAttribute>) {
        match self {
            Self::True | Self::False => {}
            Self::And(items) | Self::Or(items) => {
                for item in items {
                    item.collect_attributes(out);
                }
            }
            Self::Not(inner) => inner.collect_attributes(out),
            Self::Compare { attribute, .. }
            | Self::Between { attribute, .. }
            | Self::In { attribute, .. }
            | Self::Match { attribute, .. }
            | Self::IsNull(attribute) => out.push(attribute),
        }
    }
}

impl Not for Predicate {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Predicate], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => f.write_str("TRUE"),
            Self::False => f.write_str("FALSE"),
            Self::And(items) => write_joined(f, items, " AND "),
            Self::Or(items) => write_joined(f, items, " OR "),
            Self::Not(inner) => write!(f, "NOT {inner}"),
            Self::Compare {
                attribute,
                op,
                value,
            } => write!(f, "{} {} {value}", attribute.full_path(), op.symbol()),
            Self::Between {
                attribute,
                low,
                high,
            } => write!(f, "{} BETWEEN {low} AND {high}", attribute.full_path()),
            Self::In { attribute, values } => {
                let list: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "{} IN ({})", attribute.full_path(), list.join(", "))
            }
            Self::IsNull(attribute) => write!(f, "{} IS NULL", attribute.full_path()),
            Self::Match {
                attribute,
                mode,
                needle,
            } => {
                let pattern = match mode {
                    MatchMode::Contains => format!("%{needle}%"),
                    MatchMode::StartsWith => format!("{needle}%"),
                    MatchMode::EndsWith => format!("%{needle}"),
                };
                write!(f, "lower({}) LIKE '{pattern}'", attribute.full_path())
            }
        }
    }
}
