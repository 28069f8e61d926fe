//! Sea-ORM translation of predicates.
//!
//! Every value is bound as a query parameter; column and table names go
//! through `Alias` so they are quoted by the query builder. Attributes
//! reached through associations are read from LEFT JOINed tables aliased
//! by their association path (`customer`, `customer__address`, ...).

use async_trait::async_trait;
use sea_orm::{
    Condition, ConnectionTrait, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Select,
    sea_query::{Alias, Expr, Func, JoinType, LikeExpr, SelectStatement, SimpleExpr},
};
use std::collections::HashSet;
use std::marker::PhantomData;

use crate::filtering::{
    Comparison, JoinStep, MatchMode, Page, Predicate, ResolvedAttribute, SortDirection, SortKey,
    Value, escape_like_wildcards,
};
use crate::listing::{FilterQuery, QueryExecutor};

const LIKE_ESCAPE: char = '\\';

/// Largest OFFSET/LIMIT the drivers accept; they bind both as signed 64-bit integers.
const MAX_BOUND: u64 = i64::MAX.unsigned_abs();

/// Column reference qualified with the alias of the table holding it.
fn column(attribute: &ResolvedAttribute, root_alias: &str) -> Expr {
    let table = attribute.table_alias().unwrap_or(root_alias);
    Expr::col((Alias::new(table), Alias::new(&attribute.column)))
}

/// Bound parameter for a coerced value. Enum variants are stored by name.
#[must_use]
pub fn to_sql_value(value: &Value) -> sea_orm::Value {
    match value.clone() {
        Value::Null => Option::<String>::None.into(),
        Value::String(s) | Value::Enum(s) => s.into(),
        Value::Integer(v) => v.into(),
        Value::Long(v) => v.into(),
        Value::Double(v) => v.into(),
        Value::Float(v) => v.into(),
        Value::Decimal(v) => v.into(),
        Value::Boolean(v) => v.into(),
        Value::Date(v) => v.into(),
        Value::DateTime(v) => v.into(),
        Value::Uuid(v) => v.into(),
    }
}

fn always() -> Condition {
    Condition::all().add(Expr::cust("1 = 1"))
}

fn never() -> Condition {
    Condition::all().add(Expr::cust("1 = 0"))
}

fn like_pattern(mode: MatchMode, needle: &str) -> LikeExpr {
    let escaped = escape_like_wildcards(needle);
    let pattern = match mode {
        MatchMode::Contains => format!("%{escaped}%"),
        MatchMode::StartsWith => format!("{escaped}%"),
        MatchMode::EndsWith => format!("%{escaped}"),
    };
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// Translation that never yields an empty condition, so it can be nested anywhere.
fn translate(predicate: &Predicate, root_alias: &str) -> Condition {
    match predicate {
        Predicate::True => always(),
        Predicate::False => never(),
        Predicate::And(items) if items.is_empty() => always(),
        Predicate::Or(items) if items.is_empty() => never(),
        Predicate::And(items) => items
            .iter()
            .fold(Condition::all(), |cond, item| cond.add(translate(item, root_alias))),
        Predicate::Or(items) => items
            .iter()
            .fold(Condition::any(), |cond, item| cond.add(translate(item, root_alias))),
        Predicate::Not(inner) => Condition::all().not().add(translate(inner, root_alias)),
        Predicate::Compare {
            attribute,
            op,
            value,
        } => {
            let col = column(attribute, root_alias);
            let v = to_sql_value(value);
            let expr = match op {
                Comparison::Eq => col.eq(v),
                Comparison::Ne => col.ne(v),
                Comparison::Gt => col.gt(v),
                Comparison::Ge => col.gte(v),
                Comparison::Lt => col.lt(v),
                Comparison::Le => col.lte(v),
            };
            Condition::all().add(expr)
        }
        Predicate::Between {
            attribute,
            low,
            high,
        } => Condition::all().add(
            column(attribute, root_alias).between(to_sql_value(low), to_sql_value(high)),
        ),
        Predicate::In { values, .. } if values.is_empty() => never(),
        Predicate::In { attribute, values } => Condition::all()
            .add(column(attribute, root_alias).is_in(values.iter().map(to_sql_value))),
        Predicate::IsNull(attribute) => {
            Condition::all().add(column(attribute, root_alias).is_null())
        }
        Predicate::Match {
            attribute,
            mode,
            needle,
        } => {
            let lowered = SimpleExpr::FunctionCall(Func::lower(column(attribute, root_alias)));
            Condition::all().add(Expr::expr(lowered).like(like_pattern(*mode, needle)))
        }
    }
}

/// Translate `predicate` into a Sea-ORM condition.
///
/// `root_alias` qualifies columns of the listed entity itself, normally its
/// table name. A predicate that matches everything becomes an empty
/// condition, i.e. no WHERE clause at all.
#[must_use]
pub fn to_condition(predicate: &Predicate, root_alias: &str) -> Condition {
    if predicate.is_true() {
        Condition::all()
    } else {
        translate(predicate, root_alias)
    }
}

/// Ordering expression for one sort key; textual keys compare lower-cased.
#[must_use]
pub fn order_expr(key: &SortKey, root_alias: &str) -> SimpleExpr {
    let col = column(&key.attribute, root_alias);
    if key.ignore_case {
        SimpleExpr::FunctionCall(Func::lower(col))
    } else {
        col.into()
    }
}

const fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

/// Joins needed by the predicate and the ordering, parents before children,
/// each alias once.
#[must_use]
pub fn required_joins(query: &FilterQuery) -> Vec<JoinStep> {
    let mut seen = HashSet::new();
    query
        .predicate
        .attributes()
        .into_iter()
        .chain(query.sort.iter().map(|key| &key.attribute))
        .flat_map(|attribute| attribute.joins.iter())
        .filter(|join| seen.insert(join.alias.clone()))
        .cloned()
        .collect()
}

/// Add `LEFT JOIN <table> AS <alias> ON <parent>.<fk> = <alias>.<pk>` for each step.
pub fn apply_joins(statement: &mut SelectStatement, joins: &[JoinStep], root_alias: &str) {
    for join in joins {
        let parent = join.parent_alias.as_deref().unwrap_or(root_alias);
        statement.join_as(
            JoinType::LeftJoin,
            Alias::new(&join.table),
            Alias::new(&join.alias),
            Expr::col((Alias::new(parent), Alias::new(&join.foreign_key)))
                .equals((Alias::new(&join.alias), Alias::new(&join.primary_key))),
        );
    }
}

/// `E::find()` with joins, filter and ordering of `query` applied; no paging.
#[must_use]
pub fn filtered_select<E: EntityTrait>(query: &FilterQuery) -> Select<E> {
    let root = E::default().table_name().to_string();
    let mut select = E::find();
    apply_joins(QueryTrait::query(&mut select), &required_joins(query), &root);

    let mut select = select.filter(to_condition(&query.predicate, &root));
    for key in &query.sort {
        select = select.order_by(order_expr(key, &root), order(key.direction));
    }
    select
}

/// [`QueryExecutor`] running against a Sea-ORM connection.
#[derive(Debug)]
pub struct SeaOrmExecutor<'c, E, C> {
    db: &'c C,
    entity: PhantomData<E>,
}

impl<'c, E: EntityTrait, C: ConnectionTrait> SeaOrmExecutor<'c, E, C> {
    #[must_use]
    pub const fn new(db: &'c C) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E, C> QueryExecutor for SeaOrmExecutor<'_, E, C>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    C: ConnectionTrait + Send + Sync,
{
    type Item = E::Model;
    type Error = DbErr;

    async fn fetch_page(&self, query: &FilterQuery) -> Result<Page<E::Model>, DbErr> {
        let select = filtered_select::<E>(query);
        let total = select.clone().count(self.db).await?;
        let offset = query.page.offset();
        if offset >= total {
            return Ok(Page::new(Vec::new(), total, &query.page));
        }

        let models = select
            .offset(offset.min(MAX_BOUND))
            .limit(query.page.limit().min(MAX_BOUND))
            .all(self.db)
            .await?;
        Ok(Page::new(models, total, &query.page))
    }

    async fn fetch_all(&self) -> Result<Vec<E::Model>, DbErr> {
        E::find().all(self.db).await
    }
}
