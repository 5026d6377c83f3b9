pub mod config;
pub mod context;
pub mod errors;
pub mod eval;
pub mod link;
pub mod logger;
pub mod pipeline;
pub mod query;
pub mod schema;
pub mod utils;
pub mod value;

pub use config::QueryConfig;
pub use context::QueryContext;
pub use errors::QueryError;
pub use eval::{apply_filter, apply_query, apply_query_with_next, apply_sort};
pub use link::{FieldLink, LinkGraph, LinkKind, ModelLink};
pub use pipeline::{FindSpec, Pipeline, compile_aggregate, compile_find, full_pipeline};
pub use query::{FieldFilter, Fields, Filter, Operator, Order, Pagination, Query, Sort, SortField};
pub use schema::{Entity, FieldType, Schema};
pub use value::Value;

/// Initializes logging from the `QUERYLINK_*` environment variables.
///
/// Optional: without it the crate logs through whatever `log` backend the host installed.
///
/// # Errors
/// Returns `QueryError::Config` if the log directory or files cannot be created.
pub fn init() -> Result<(), QueryError> {
    logger::configure_from_env()
}
