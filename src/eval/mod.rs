//! In-memory evaluation of queries over collections of typed records.
mod apply;
mod compare;
mod path;

pub use apply::{apply_filter, apply_query, apply_query_with_next, apply_sort};
