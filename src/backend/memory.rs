//! In-process evaluation of predicates.
//!
//! Records expose their attribute values through [`Record`]; [`evaluate`]
//! walks the predicate with the same three-valued logic SQL uses, so a
//! comparison against a missing value is neither true nor false and the
//! record is not selected. [`MemoryExecutor`] layers sorting and paging on
//! top for callers (and tests) holding their data in a `Vec`.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::convert::Infallible;

use crate::filtering::{
    Comparison, MatchMode, Page, Predicate, ResolvedAttribute, SortDirection, SortKey, Value,
};
use crate::listing::{FilterQuery, QueryExecutor};

/// Attribute access for in-memory records.
///
/// Names are the metamodel attribute names, not column names.
pub trait Record {
    /// Value of a scalar attribute; `None` is read as `Value::Null`.
    fn value(&self, attribute: &str) -> Option<Value>;

    /// Target of a to-one association; `None` when the link is empty.
    fn association(&self, _name: &str) -> Option<&dyn Record> {
        None
    }
}

/// Value of `attribute` on `record`, following its association path.
/// A broken link anywhere on the path reads as `Null`, like a LEFT JOIN.
#[must_use]
pub fn read_attribute(record: &dyn Record, attribute: &ResolvedAttribute) -> Value {
    let mut current = record;
    for hop in &attribute.path {
        match current.association(hop) {
            Some(next) => current = next,
            None => return Value::Null,
        }
    }
    current.value(&attribute.name).unwrap_or(Value::Null)
}

fn and3(items: impl Iterator<Item = Option<bool>>) -> Option<bool> {
    let mut result = Some(true);
    for item in items {
        match item {
            Some(false) => return Some(false),
            None => result = None,
            Some(true) => {}
        }
    }
    result
}

fn or3(items: impl Iterator<Item = Option<bool>>) -> Option<bool> {
    let mut result = Some(false);
    for item in items {
        match item {
            Some(true) => return Some(true),
            None => result = None,
            Some(false) => {}
        }
    }
    result
}

fn compare(lhs: &Value, op: Comparison, rhs: &Value) -> Option<bool> {
    let ordering = lhs.compare(rhs)?;
    Some(match op {
        Comparison::Eq => ordering == Ordering::Equal,
        Comparison::Ne => ordering != Ordering::Equal,
        Comparison::Gt => ordering == Ordering::Greater,
        Comparison::Ge => ordering != Ordering::Less,
        Comparison::Lt => ordering == Ordering::Less,
        Comparison::Le => ordering != Ordering::Greater,
    })
}

fn text_match(value: &Value, mode: MatchMode, needle: &str) -> Option<bool> {
    let haystack = value.as_text()?.to_lowercase();
    Some(match mode {
        MatchMode::Contains => haystack.contains(needle),
        MatchMode::StartsWith => haystack.starts_with(needle),
        MatchMode::EndsWith => haystack.ends_with(needle),
    })
}

/// Three-valued evaluation: `None` stands for SQL's UNKNOWN.
fn evaluate3(predicate: &Predicate, record: &dyn Record) -> Option<bool> {
    match predicate {
        Predicate::True => Some(true),
        Predicate::False => Some(false),
        Predicate::And(items) => and3(items.iter().map(|p| evaluate3(p, record))),
        Predicate::Or(items) => or3(items.iter().map(|p| evaluate3(p, record))),
        Predicate::Not(inner) => evaluate3(inner, record).map(|b| !b),
        Predicate::Compare {
            attribute,
            op,
            value,
        } => compare(&read_attribute(record, attribute), *op, value),
        Predicate::Between {
            attribute,
            low,
            high,
        } => {
            let current = read_attribute(record, attribute);
            and3(
                [
                    compare(&current, Comparison::Ge, low),
                    compare(&current, Comparison::Le, high),
                ]
                .into_iter(),
            )
        }
        Predicate::In { attribute, values } => {
            if values.is_empty() {
                return Some(false);
            }
            let current = read_attribute(record, attribute);
            or3(values.iter().map(|v| compare(&current, Comparison::Eq, v)))
        }
        Predicate::IsNull(attribute) => Some(read_attribute(record, attribute).is_null()),
        Predicate::Match {
            attribute,
            mode,
            needle,
        } => text_match(&read_attribute(record, attribute), *mode, needle),
    }
}

/// Whether `record` is selected by `predicate`. UNKNOWN counts as not selected.
#[must_use]
pub fn evaluate(predicate: &Predicate, record: &dyn Record) -> bool {
    evaluate3(predicate, record) == Some(true)
}

fn sort_value(record: &dyn Record, key: &SortKey) -> Value {
    let value = read_attribute(record, &key.attribute);
    match value {
        Value::String(s) if key.ignore_case => Value::String(s.to_lowercase()),
        other => other,
    }
}

/// Nulls sort before every other value, as in SQLite and MySQL.
fn compare_for_sort(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

/// Order `records` by `keys`, most significant first. The sort is stable.
pub fn sort_records<R: Record>(records: &mut [R], keys: &[SortKey]) {
    records.sort_by(|a, b| {
        keys.iter()
            .map(|key| {
                let ordering = compare_for_sort(&sort_value(a, key), &sort_value(b, key));
                match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

/// [`QueryExecutor`] over an owned list of records.
#[derive(Debug, Clone, Default)]
pub struct MemoryExecutor<R> {
    records: Vec<R>,
}

impl<R> MemoryExecutor<R> {
    #[must_use]
    pub const fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }
}

impl<R> FromIterator<R> for MemoryExecutor<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl<R> QueryExecutor for MemoryExecutor<R>
where
    R: Record + Clone + Send + Sync,
{
    type Item = R;
    type Error = Infallible;

    async fn fetch_page(&self, query: &FilterQuery) -> Result<Page<R>, Infallible> {
        let mut matching: Vec<R> = self
            .records
            .iter()
            .filter(|record| evaluate(&query.predicate, *record))
            .cloned()
            .collect();
        sort_records(&mut matching, &query.sort);

        let total = matching.len() as u64;
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page.limit()).unwrap_or(usize::MAX);
        let content = matching.into_iter().skip(offset).take(limit).collect();
        Ok(Page::new(content, total, &query.page))
    }

    async fn fetch_all(&self) -> Result<Vec<R>, Infallible> {
        Ok(self.records.clone())
    }
}
