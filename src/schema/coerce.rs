use crate::errors::QueryError;
use crate::value::Value;
use chrono::{DateTime, Utc};

use super::types::{Decoder, FieldType};

/// Literal accepted inside an `in` list on optional fields to match missing/null values.
pub const NULL_LITERAL: &str = "null";

/// Converts a raw filter string into the native representation of `ty`.
///
/// # Errors
/// Returns the coercion failure matching the field kind.
pub fn coerce(ty: &FieldType, raw: &str) -> Result<Value, QueryError> {
    match ty {
        FieldType::List(elem) | FieldType::Optional(elem) => coerce(elem, raw),
        FieldType::String => Ok(Value::String(raw.to_string())),
        FieldType::Int => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| QueryError::NumericParse { raw: raw.to_string(), reason: e.to_string() }),
        FieldType::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| QueryError::NumericParse { raw: raw.to_string(), reason: e.to_string() }),
        FieldType::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(QueryError::BadBoolean(raw.to_string())),
        },
        FieldType::Timestamp => {
            let ts = DateTime::parse_from_rfc3339(raw)?;
            Ok(Value::Timestamp(ts.with_timezone(&Utc)))
        }
        FieldType::Custom(custom) => match custom.decoder {
            Decoder::Query(decode) => decode(raw)
                .map_err(|source| QueryError::CustomDecode { type_name: custom.name.to_string(), source }),
            Decoder::QuotedText(decode) => decode(&format!("\"{raw}\"")).map_err(|e| {
                QueryError::CustomDecode { type_name: custom.name.to_string(), source: Box::new(e) }
            }),
        },
        FieldType::Struct(_) | FieldType::Opaque(_) => Err(QueryError::UnsupportedFieldType(ty.name())),
    }
}

/// Coerces a comma-separated `in` literal into a list of element values.
///
/// On nullable fields the token `null` becomes [`Value::Null`].
///
/// # Errors
/// Fails on the first token that does not coerce.
pub fn coerce_in(ty: &FieldType, raw: &str) -> Result<Value, QueryError> {
    let nullable = ty.is_nullable();
    let mut out = Vec::new();
    for token in raw.split(',') {
        if nullable && token == NULL_LITERAL {
            out.push(Value::Null);
            continue;
        }
        out.push(coerce(ty, token)?);
    }
    Ok(Value::List(out))
}
