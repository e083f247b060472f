//! `SQLite` storage backend.
//!
//! ## Module Structure
//!
//! - [`connection`]: mutex handling and pragma configuration
//! - [`sql`]: LIKE escaping
//! - [`metrics`]: per-operation counters and latency histograms
//! - `store`: the [`SqliteHealthStore`] itself

mod connection;
mod metrics;
mod sql;
mod store;

pub use connection::{acquire_lock, configure_connection};
pub use metrics::record_operation_metrics;
pub use sql::escape_like_wildcards;
pub use store::SqliteHealthStore;
