//! Statically declared attribute metadata.
//!
//! Every entity that can be listed is described once, at startup, by an
//! [`EntityMeta`]: attribute names, the native type of each scalar, the
//! backing column, and the to-one associations that dotted filter paths may
//! traverse. The filtering engine never inspects records or tables directly;
//! it only reads this table.
//!
//! ```rust
//! use crudfilter::metamodel::{EntityMeta, EnumType, Metamodel, ValueType};
//!
//! let metamodel = Metamodel::new()
//!     .with_entity(
//!         EntityMeta::new("customer", "customers")
//!             .scalar("id", ValueType::Long)
//!             .scalar_column("lastName", "last_name", ValueType::String),
//!     )
//!     .with_entity(
//!         EntityMeta::new("order", "orders")
//!             .scalar("id", ValueType::Long)
//!             .scalar(
//!                 "status",
//!                 ValueType::Enum(EnumType::new("OrderStatus", ["PENDING", "CONFIRMED"])),
//!             )
//!             .association("customer", "customer", "customer_id"),
//!     );
//!
//! assert!(metamodel.entity("order").is_some());
//! ```

use std::collections::HashMap;
use std::fmt;

/// Enumeration type: a name plus its symbolic variant names.
///
/// Variants are matched against the upper-cased filter value, so they are
/// normally declared in upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn variant(&self, symbol: &str) -> Option<&str> {
        self.variants
            .iter()
            .find(|v| v.as_str() == symbol)
            .map(String::as_str)
    }
}

/// Native type tag of a scalar attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Integer,
    Long,
    Double,
    Float,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Uuid,
    Enum(EnumType),
}

impl ValueType {
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, Self::String)
    }

    /// Types that support `<`, `>` and `BETWEEN`.
    #[must_use]
    pub const fn is_orderable(&self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Integer
                | Self::Long
                | Self::Double
                | Self::Float
                | Self::Decimal
                | Self::Date
                | Self::DateTime
        )
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Double => "double",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Uuid => "uuid",
            Self::Enum(e) => &e.name,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(e) => write!(f, "enum {}", e.name),
            other => f.write_str(other.name()),
        }
    }
}

/// To-one link from one entity to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    /// Name of the target entity in the [`Metamodel`]
    pub target_entity: String,
    /// Column on the owning table that references the target's primary key
    pub foreign_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeKind {
    Scalar(ValueType),
    Association(Association),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
    pub name: String,
    pub column: String,
    pub kind: AttributeKind,
    /// Included in global search (only meaningful for string attributes).
    pub searchable: bool,
    /// Visible to filtering, searching and sorting at all.
    pub exposed: bool,
}

impl AttributeDef {
    pub fn scalar(name: impl Into<String>, value_type: ValueType) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            kind: AttributeKind::Scalar(value_type),
            searchable: true,
            exposed: true,
        }
    }

    pub fn association(
        name: impl Into<String>,
        target_entity: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            kind: AttributeKind::Association(Association {
                target_entity: target_entity.into(),
                foreign_key: foreign_key.into(),
            }),
            searchable: false,
            exposed: true,
        }
    }

    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    #[must_use]
    pub fn exclude_from_search(mut self) -> Self {
        self.searchable = false;
        self
    }

    /// Hide the attribute from every filtering surface (e.g. password hashes).
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.exposed = false;
        self
    }

    #[must_use]
    pub fn value_type(&self) -> Option<&ValueType> {
        match &self.kind {
            AttributeKind::Scalar(ty) => Some(ty),
            AttributeKind::Association(_) => None,
        }
    }

    #[must_use]
    pub fn is_searchable_text(&self) -> bool {
        self.exposed && self.searchable && self.value_type().is_some_and(ValueType::is_textual)
    }
}

/// Attribute table for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMeta {
    pub name: String,
    pub table: String,
    /// Attribute name of the primary key, used as the sort tiebreaker
    pub primary_key: String,
    attributes: Vec<AttributeDef>,
}

impl EntityMeta {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            primary_key: "id".to_string(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_primary_key(mut self, attribute: impl Into<String>) -> Self {
        self.primary_key = attribute.into();
        self
    }

    /// Add (or replace) an attribute definition.
    #[must_use]
    pub fn attribute(mut self, def: AttributeDef) -> Self {
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == def.name) {
            *existing = def;
        } else {
            self.attributes.push(def);
        }
        self
    }

    #[must_use]
    pub fn scalar(self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.attribute(AttributeDef::scalar(name, value_type))
    }

    #[must_use]
    pub fn scalar_column(
        self,
        name: impl Into<String>,
        column: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        self.attribute(AttributeDef::scalar(name, value_type).with_column(column))
    }

    #[must_use]
    pub fn association(
        self,
        name: impl Into<String>,
        target_entity: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.attribute(AttributeDef::association(name, target_entity, foreign_key))
    }

    /// Look up an exposed attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.exposed && a.name == name)
    }

    /// Column backing the primary key, even when the key attribute is hidden.
    #[must_use]
    pub fn primary_key_column(&self) -> &str {
        self.attributes
            .iter()
            .find(|a| a.name == self.primary_key)
            .map_or(self.primary_key.as_str(), |a| a.column.as_str())
    }

    /// Exposed attributes in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDef> {
        self.attributes.iter().filter(|a| a.exposed)
    }

    /// Exposed string attributes that take part in global search.
    pub fn searchable_attributes(&self) -> impl Iterator<Item = &AttributeDef> {
        self.attributes.iter().filter(|a| a.is_searchable_text())
    }
}

/// Registry of every entity the engine can list, keyed by entity name.
#[derive(Debug, Clone, Default)]
pub struct Metamodel {
    entities: HashMap<String, EntityMeta>,
}

impl Metamodel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entity(mut self, entity: EntityMeta) -> Self {
        self.register(entity);
        self
    }

    pub fn register(&mut self, entity: EntityMeta) {
        self.entities.insert(entity.name.clone(), entity);
    }

    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&EntityMeta> {
        self.entities.get(name)
    }
}
