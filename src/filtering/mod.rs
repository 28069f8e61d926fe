//! # Dynamic Filtering, Search & Sorting
//!
//! Translates a [`FilterSpecification`](crate::models::FilterSpecification)
//! into a backend-agnostic [`Predicate`] and a normalized page request.
//!
//! ## Pipeline
//!
//! 1. **Path resolution** ([`path`]): `"customer.lastName"` becomes a typed
//!    attribute plus the joins needed to reach it.
//! 2. **Coercion** ([`coerce`]): the textual value becomes the attribute's
//!    native type (`"19.99"` on a decimal column becomes a `Decimal`).
//! 3. **Operator translation** ([`conditions`]): one of the seventeen
//!    operators becomes one predicate node.
//! 4. **Global search** ([`search`]): case-insensitive contains, ORed over
//!    every searchable string attribute.
//! 5. **Composition** ([`compose`]): everything ANDed; failed criteria are
//!    left out and reported as diagnostics.
//! 6. **Pagination & sorting** ([`pagination`], [`sort`]).
//!
//! ## Example
//!
//! ```rust
//! use crudfilter::config::FilterConfig;
//! use crudfilter::filtering::{build_specification, Predicate};
//! use crudfilter::metamodel::{EntityMeta, Metamodel, ValueType};
//! use crudfilter::models::{FilterCriterion, FilterSpecification, Operator};
//!
//! let metamodel = Metamodel::new().with_entity(
//!     EntityMeta::new("product", "products")
//!         .scalar("id", ValueType::Long)
//!         .scalar("name", ValueType::String)
//!         .scalar("price", ValueType::Decimal),
//! );
//!
//! let spec = FilterSpecification::new()
//!     .with_filter(FilterCriterion::between("price", "10", "20"))
//!     .with_filter(FilterCriterion::new("colour", Operator::Equals, "red"));
//!
//! let outcome = build_specification(&metamodel, "product", &spec, &FilterConfig::default());
//! assert!(matches!(outcome.predicate, Predicate::Between { .. }));
//! assert_eq!(outcome.diagnostics.len(), 1); // "colour" is not an attribute
//! ```

pub mod coerce;
pub mod compose;
pub mod conditions;
pub mod pagination;
pub mod path;
pub mod predicate;
pub mod search;
pub mod sort;

// Re-export commonly used items
pub use coerce::{Value, coerce};
pub use compose::{FilterOutcome, build_filter, build_specification};
pub use conditions::build_criterion;
pub use pagination::{Page, PageRequest};
pub use path::{JoinStep, ResolveError, ResolvedAttribute, is_valid_field_name, resolve};
pub use predicate::{Comparison, MatchMode, Predicate};
pub use search::{build_global_search, escape_like_wildcards};
pub use sort::{SortDirection, SortKey, resolve_sort};
