// Submodules for separation of concerns
mod fields;
mod filter;
mod parse;
mod sort;
mod types;

// Public API re-exports
pub use fields::Fields;
pub use filter::{FieldFilter, Filter};
pub use parse::{format_key, format_key_explicit, parse_filter_json, parse_key, parse_string_filter};
pub use sort::{Sort, SortField};
pub use types::{Operator, Order, Pagination};

/// A complete read request. `Clone` deep-copies filter and sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Free-text search; carried through untouched for the caller's search backend.
    pub search: String,
    pub filter: Filter,
    pub sort: Sort,
    pub pagination: Pagination,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub const fn paginate(mut self, offset: u64, limit: u64) -> Self {
        self.pagination = Pagination { offset, limit };
        self
    }

    /// Every field the query touches (filter then sort), deduplicated; drives minimal projection.
    #[must_use]
    pub fn fields(&self) -> Fields {
        let mut f = self.filter.fields();
        f.extend(self.sort.fields());
        f.unique()
    }
}
