//! Compilation of queries into document-store find arguments and aggregation stages.
//!
//! Output is plain `bson::Document` values; nothing here talks to a database.

mod aggregate;
mod find;
mod lookup;
mod project;

pub use aggregate::{compile_aggregate, full_pipeline};
pub use find::{FindSpec, compile_filter, compile_find, compile_sort};
pub use project::{backend_path, project};

/// Ordered aggregation stages.
pub type Pipeline = Vec<bson::Document>;
