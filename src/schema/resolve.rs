use crate::config::DEFAULT_MAX_PATH_DEPTH;
use crate::errors::QueryError;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::types::{FieldType, Schema};

/// Walks a dotted path through a schema and returns the leaf field type.
///
/// Structs match segments by tag name, lists consume a numeric segment as an index
/// and otherwise fan out (the segment is re-matched against the element type),
/// optionals unwrap without consuming anything.
///
/// # Errors
/// `QueryError::InvalidPath` naming the first segment that cannot be followed.
pub fn resolve_path(schema: &Schema, path: &str) -> Result<FieldType, QueryError> {
    resolve_path_bounded(schema, path, DEFAULT_MAX_PATH_DEPTH)
}

pub(crate) fn resolve_path_bounded(
    schema: &Schema,
    path: &str,
    max_depth: usize,
) -> Result<FieldType, QueryError> {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() > max_depth {
        return Err(QueryError::InvalidPath(path.to_string()));
    }

    let first = parts[0];
    let mut t = schema.get(first).map(|f| f.ty.clone()).ok_or_else(|| QueryError::invalid_path(first))?;
    let mut i = 1;
    while i < parts.len() {
        t = match t {
            FieldType::Struct(schema_ref) => {
                let nested = schema_ref();
                let f = nested.get(parts[i]).ok_or_else(|| QueryError::invalid_path(parts[i]))?;
                i += 1;
                f.ty.clone()
            }
            FieldType::List(elem) => {
                if parts[i].parse::<usize>().is_ok() {
                    i += 1;
                }
                *elem
            }
            FieldType::Optional(inner) => *inner,
            _ => return Err(QueryError::invalid_path(parts[i])),
        };
    }
    Ok(t)
}

/// Memoized path resolution, keyed by (schema identity, path).
///
/// Schemas are `'static`, so the descriptor's address identifies it; two schemas that
/// happen to share a name keep separate entries.
///
/// Entries are computed lazily and never invalidated. Two callers racing on the same
/// key may both compute it; the result is identical so the second insert is harmless.
#[derive(Debug, Default)]
pub struct PathCache {
    entries: RwLock<HashMap<usize, HashMap<String, FieldType>>>,
    max_depth: Option<usize>,
}

impl PathCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { entries: RwLock::default(), max_depth: Some(max_depth) }
    }

    /// # Errors
    /// Same as [`resolve_path`]; failures are not cached.
    pub fn resolve(&self, schema: &'static Schema, path: &str) -> Result<FieldType, QueryError> {
        let key = std::ptr::from_ref(schema).addr();
        if let Some(hit) = self.entries.read().get(&key).and_then(|m| m.get(path)) {
            return Ok(hit.clone());
        }
        let t = resolve_path_bounded(schema, path, self.max_depth.unwrap_or(DEFAULT_MAX_PATH_DEPTH))?;
        log::debug!("resolved {}.{} -> {}", schema.name, path, t.name());
        self.entries.write().entry(key).or_default().insert(path.to_string(), t.clone());
        Ok(t)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
