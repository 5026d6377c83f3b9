use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid path part: {0}")]
    InvalidPath(String),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("unsupported field type: {0}")]
    UnsupportedFieldType(String),

    #[error("unknown bool value: {0}")]
    BadBoolean(String),

    #[error("cannot parse {raw:?} as number: {reason}")]
    NumericParse { raw: String, reason: String },

    #[error("custom decode failed for {type_name}: {source}")]
    CustomDecode {
        type_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("cannot parse as timestamp: {0}")]
    TimestampParse(#[from] chrono::ParseError),

    #[error("in-set for {field} has {len} members, limit is {max}")]
    InSetTooLarge { field: String, len: usize, max: usize },

    #[error("cyclic link graph: {0}")]
    CyclicLinkGraph(String),

    #[error("unknown linked model: {0}")]
    UnknownModel(String),

    #[error("Serde JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl QueryError {
    pub(crate) fn invalid_path(segment: &str) -> Self {
        Self::InvalidPath(segment.to_string())
    }
}
