//! Storage layer.
//!
//! The core only talks to storage through [`HealthStore`]. The bundled
//! backend is [`SqliteHealthStore`], which owns the schema bootstrap and seeds
//! the built-in tips on first use.

pub mod sqlite;
mod traits;

pub use sqlite::SqliteHealthStore;
pub use traits::{ConditionPattern, HealthStore};
