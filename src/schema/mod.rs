//! Explicit entity layouts, path resolution and literal coercion.
mod coerce;
mod resolve;
mod types;

pub use coerce::{NULL_LITERAL, coerce, coerce_in};
pub use resolve::{PathCache, resolve_path};
pub use types::{BoxError, CustomType, Decoder, Entity, Field, FieldType, QueryDecoder, QuotedTextDecoder, Schema, SchemaRef};
