use crate::value::Value;
use std::fmt;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Decoder for a string-keyed query literal.
pub type QueryDecoder = fn(&str) -> Result<Value, BoxError>;

/// Decoder fed the raw literal wrapped in JSON quotes.
pub type QuotedTextDecoder = fn(&str) -> Result<Value, serde_json::Error>;

/// Lazy reference to another registered schema; allows self-referencing layouts.
pub type SchemaRef = fn() -> &'static Schema;

/// Implemented by every record type that can be queried.
///
/// Field names in the schema must match the names the type serializes under.
pub trait Entity {
    fn schema() -> &'static Schema;
}

#[derive(Clone, Copy)]
pub enum Decoder {
    Query(QueryDecoder),
    QuotedText(QuotedTextDecoder),
}

#[derive(Clone, Copy)]
pub struct CustomType {
    pub name: &'static str,
    pub decoder: Decoder,
    /// Whether the decoded representation is numeric (drives substring compilation).
    pub numeric: bool,
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.decoder {
            Decoder::Query(_) => "query",
            Decoder::QuotedText(_) => "quoted-text",
        };
        f.debug_struct("CustomType").field("name", &self.name).field("decoder", &kind).finish()
    }
}

#[derive(Clone)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    String,
    Timestamp,
    List(Box<FieldType>),
    Optional(Box<FieldType>),
    Struct(SchemaRef),
    Custom(CustomType),
    /// A type with no query representation (maps, blobs, ...).
    Opaque(&'static str),
}

impl FieldType {
    #[must_use]
    pub fn list(elem: Self) -> Self {
        Self::List(Box::new(elem))
    }

    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    #[must_use]
    pub fn entity<E: Entity>() -> Self {
        Self::Struct(E::schema)
    }

    #[must_use]
    pub const fn custom(name: &'static str, decode: QueryDecoder) -> Self {
        Self::Custom(CustomType { name, decoder: Decoder::Query(decode), numeric: false })
    }

    #[must_use]
    pub const fn quoted_text(name: &'static str, decode: QuotedTextDecoder) -> Self {
        Self::Custom(CustomType { name, decoder: Decoder::QuotedText(decode), numeric: false })
    }

    /// Uuid stored as its hyphenated string form.
    #[must_use]
    pub const fn uuid() -> Self {
        Self::quoted_text("uuid", decode_uuid)
    }

    /// Strips every `List`/`Optional` wrapper.
    #[must_use]
    pub fn leaf(&self) -> &Self {
        match self {
            Self::List(inner) | Self::Optional(inner) => inner.leaf(),
            other => other,
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        match self.leaf() {
            Self::Int | Self::Float => true,
            Self::Custom(c) => c.numeric,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Optional(_) => true,
            Self::List(inner) => inner.is_nullable(),
            _ => false,
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Bool => "bool".into(),
            Self::Int => "int".into(),
            Self::Float => "float".into(),
            Self::String => "string".into(),
            Self::Timestamp => "timestamp".into(),
            Self::List(inner) => format!("[]{}", inner.name()),
            Self::Optional(inner) => format!("*{}", inner.name()),
            Self::Struct(schema) => schema().name.to_string(),
            Self::Custom(c) => c.name.to_string(),
            Self::Opaque(name) => (*name).to_string(),
        }
    }
}

fn decode_uuid(quoted: &str) -> Result<Value, serde_json::Error> {
    let id: uuid::Uuid = serde_json::from_str(quoted)?;
    Ok(Value::String(id.hyphenated().to_string()))
}

// fn pointers do not compare reliably; identity is by name.
impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool, Self::Bool)
            | (Self::Int, Self::Int)
            | (Self::Float, Self::Float)
            | (Self::String, Self::String)
            | (Self::Timestamp, Self::Timestamp) => true,
            (Self::List(a), Self::List(b)) | (Self::Optional(a), Self::Optional(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => a().name == b().name,
            (Self::Custom(a), Self::Custom(b)) => a.name == b.name,
            (Self::Opaque(a), Self::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

/// Explicit field layout of an entity, registered once per type.
///
/// The primary key is the field named `id`; it is stored under the backend's `_id`.
#[derive(Debug, Clone)]
pub struct Schema {
    pub name: &'static str,
    pub fields: Vec<Field>,
}

impl Schema {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name, fields: Vec::new() }
    }

    #[must_use]
    pub fn field(mut self, name: &'static str, ty: FieldType) -> Self {
        self.fields.push(Field { name, ty });
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
