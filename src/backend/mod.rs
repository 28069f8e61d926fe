//! Predicate execution backends.
//!
//! - [`sql`]: Sea-ORM `Condition`s, joins and ordering, executed on any `ConnectionTrait`.
//! - [`memory`]: direct evaluation over records implementing [`memory::Record`].

pub mod memory;
pub mod sql;

pub use memory::{MemoryExecutor, Record};
pub use sql::{SeaOrmExecutor, to_condition};
