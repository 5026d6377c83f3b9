use crate::config::QueryConfig;
use crate::errors::QueryError;
use crate::schema::{Entity, FieldType, PathCache, Schema};

/// Owner of the path cache and the query configuration.
///
/// Build one at startup next to the schemas and pass it by reference into parsing,
/// evaluation and pipeline compilation.
#[derive(Debug, Default)]
pub struct QueryContext {
    cache: PathCache,
    config: QueryConfig,
}

impl QueryContext {
    #[must_use]
    pub fn new(config: QueryConfig) -> Self {
        Self { cache: PathCache::with_max_depth(config.max_path_depth), config }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(QueryConfig::from_env())
    }

    #[must_use]
    pub const fn config(&self) -> &QueryConfig {
        &self.config
    }

    #[must_use]
    pub const fn cache(&self) -> &PathCache {
        &self.cache
    }

    /// # Errors
    /// `QueryError::InvalidPath` when `path` does not exist on `E`.
    pub fn resolve<E: Entity>(&self, path: &str) -> Result<FieldType, QueryError> {
        self.cache.resolve(E::schema(), path)
    }

    /// # Errors
    /// `QueryError::InvalidPath` when `path` does not exist on `schema`.
    pub fn resolve_in(&self, schema: &'static Schema, path: &str) -> Result<FieldType, QueryError> {
        self.cache.resolve(schema, path)
    }
}
