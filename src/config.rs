use crate::errors::QueryError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// Safety limits to prevent resource abuse
pub(crate) const DEFAULT_MAX_PATH_DEPTH: usize = 32;
pub(crate) const DEFAULT_MAX_IN_SET: usize = 1000;

/// Knobs shared by the resolver, the evaluator and the pipeline compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Compile `substr` on numeric fields to a stringify-and-contains expression.
    /// When off, numeric `substr` compiles to exact equality (index friendly).
    pub numeric_substring: bool,
    pub max_path_depth: usize,
    pub max_in_set: usize,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            numeric_substring: true,
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            max_in_set: DEFAULT_MAX_IN_SET,
            log_level: None,
            log_dir: None,
        }
    }
}

impl QueryConfig {
    /// Defaults overridden by environment variables if present:
    /// - QUERYLINK_NUMERIC_SUBSTRING
    /// - QUERYLINK_MAX_PATH_DEPTH
    /// - QUERYLINK_MAX_IN_SET
    /// - QUERYLINK_LOG_LEVEL
    /// - QUERYLINK_LOG_DIR
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// # Errors
    /// Returns `QueryError::Config` when the TOML is malformed.
    pub fn from_toml_str(s: &str) -> Result<Self, QueryError> {
        toml::from_str::<Self>(s).map_err(|e| QueryError::Config(e.to_string()))
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("QUERYLINK_NUMERIC_SUBSTRING") {
            self.numeric_substring = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(n) = lookup("QUERYLINK_MAX_PATH_DEPTH").and_then(|s| s.parse::<usize>().ok()) {
            self.max_path_depth = n;
        }
        if let Some(n) = lookup("QUERYLINK_MAX_IN_SET").and_then(|s| s.parse::<usize>().ok()) {
            self.max_in_set = n;
        }
        if let Some(level) = lookup("QUERYLINK_LOG_LEVEL") {
            self.log_level = Some(level);
        }
        if let Some(dir) = lookup("QUERYLINK_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(dir));
        }
        self
    }
}
