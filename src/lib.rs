//! Generic filtering, search, sorting and pagination for listing endpoints.
//!
//! A [`FilterSpecification`] (criteria, a global search term, page and sort
//! parameters, usually deserialized from a request) is turned into a
//! [`Predicate`](filtering::Predicate) over an entity described in a
//! [`Metamodel`], then executed through a [`QueryExecutor`]. Bad criteria are
//! skipped and reported, never fatal.

pub mod backend;
pub mod config;
pub mod diagnostics;
pub mod filtering;
pub mod listing;
pub mod metamodel;
pub mod models;

pub use config::FilterConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use filtering::{Page, PageRequest, SortDirection};
pub use listing::{FilterQuery, ListingService, QueryExecutor, find_all, find_page};
pub use metamodel::{EntityMeta, Metamodel, ValueType};
pub use models::{FilterCriterion, FilterSpecification, Operator};
