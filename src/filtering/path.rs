//! Dotted attribute path resolution.
//!
//! `"customer.lastName"` on `order` resolves by walking the `customer`
//! association to the `customer` entity and picking its `lastName` scalar.
//! Each association hop is recorded as a [`JoinStep`] so SQL backends know
//! which tables to join and under which alias.

use std::fmt;

use crate::metamodel::{AttributeKind, Metamodel, ValueType};

/// One LEFT JOIN needed to reach an associated attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinStep {
    /// Alias of the joined table, unique per association path (`customer__address`)
    pub alias: String,
    pub table: String,
    /// Alias of the table holding the foreign key; `None` for the root table
    pub parent_alias: Option<String>,
    pub foreign_key: String,
    pub primary_key: String,
}

/// A field path resolved against the metamodel down to a typed scalar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedAttribute {
    /// Association names traversed from the root, in order
    pub path: Vec<String>,
    /// Terminal attribute name
    pub name: String,
    pub column: String,
    pub value_type: ValueType,
    pub joins: Vec<JoinStep>,
}

impl ResolvedAttribute {
    /// Dotted form of the path, e.g. `customer.lastName`.
    #[must_use]
    pub fn full_path(&self) -> String {
        let mut segments = self.path.clone();
        segments.push(self.name.clone());
        segments.join(".")
    }

    /// Alias of the table holding the column; `None` means the root table.
    #[must_use]
    pub fn table_alias(&self) -> Option<&str> {
        self.joins.last().map(|j| j.alias.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Empty path, empty segment (`a..b`, `.a`, `a.`) or rejected by validation
    InvalidFieldName(String),
    UnknownEntity(String),
    UnknownAttribute { entity: String, attribute: String },
    /// A non-final segment names a scalar, so nothing can follow it
    NotAnAssociation { entity: String, attribute: String },
    /// The final segment names an association instead of a scalar
    NotTerminal { entity: String, attribute: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFieldName(name) => write!(f, "invalid field name '{name}'"),
            Self::UnknownEntity(entity) => write!(f, "unknown entity '{entity}'"),
            Self::UnknownAttribute { entity, attribute } => {
                write!(f, "field '{attribute}' not found in entity '{entity}'")
            }
            Self::NotAnAssociation { entity, attribute } => write!(
                f,
                "field '{attribute}' of entity '{entity}' is not an association"
            ),
            Self::NotTerminal { entity, attribute } => write!(
                f,
                "field '{attribute}' of entity '{entity}' is an association, not a filterable value"
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Basic field name validation
#[must_use]
pub fn is_valid_field_name(field_name: &str, max_length: usize) -> bool {
    !field_name.is_empty()
        && field_name.len() <= max_length
        && !field_name.starts_with('_')
        && field_name.split('.').all(|segment| !segment.is_empty())
}

/// Resolve `field` against the attributes of `root_entity`.
///
/// # Errors
///
/// Returns a [`ResolveError`] when any segment cannot be resolved. Callers
/// treat this as "criterion not applicable", never as a request failure.
pub fn resolve(
    metamodel: &Metamodel,
    root_entity: &str,
    field: &str,
) -> Result<ResolvedAttribute, ResolveError> {
    if field.is_empty() || field.split('.').any(str::is_empty) {
        return Err(ResolveError::InvalidFieldName(field.to_string()));
    }

    let mut entity = metamodel
        .entity(root_entity)
        .ok_or_else(|| ResolveError::UnknownEntity(root_entity.to_string()))?;
    let mut path = Vec::new();
    let mut joins: Vec<JoinStep> = Vec::new();
    let mut segments = field.split('.').peekable();

    while let Some(segment) = segments.next() {
        let attribute = entity
            .get(segment)
            .ok_or_else(|| ResolveError::UnknownAttribute {
                entity: entity.name.clone(),
                attribute: segment.to_string(),
            })?;
        let is_last = segments.peek().is_none();

        match (&attribute.kind, is_last) {
            (AttributeKind::Scalar(value_type), true) => {
                return Ok(ResolvedAttribute {
                    path,
                    name: attribute.name.clone(),
                    column: attribute.column.clone(),
                    value_type: value_type.clone(),
                    joins,
                });
            }
            (AttributeKind::Scalar(_), false) => {
                return Err(ResolveError::NotAnAssociation {
                    entity: entity.name.clone(),
                    attribute: segment.to_string(),
                });
            }
            (AttributeKind::Association(_), true) => {
                return Err(ResolveError::NotTerminal {
                    entity: entity.name.clone(),
                    attribute: segment.to_string(),
                });
            }
            (AttributeKind::Association(association), false) => {
                let target = metamodel
                    .entity(&association.target_entity)
                    .ok_or_else(|| ResolveError::UnknownEntity(association.target_entity.clone()))?;
                path.push(attribute.name.clone());
                joins.push(JoinStep {
                    alias: path.join("__"),
                    table: target.table.clone(),
                    parent_alias: joins.last().map(|j| j.alias.clone()),
                    foreign_key: association.foreign_key.clone(),
                    primary_key: target.primary_key_column().to_string(),
                });
                entity = target;
            }
        }
    }

    // split() always yields at least one segment, and every branch above returns on the last one
    Err(ResolveError::InvalidFieldName(field.to_string()))
}
