use std::collections::BTreeMap;

use super::filter::{FieldFilter, Filter};
use super::types::Operator;
use crate::context::QueryContext;
use crate::errors::QueryError;
use crate::schema::{Entity, coerce, coerce_in};

/// Splits `path{op}` into its path and operator. A key without braces (or with empty
/// braces) uses [`Operator::Equal`].
///
/// # Errors
/// `QueryError::UnknownOperator` for tokens outside the operator set or an unterminated brace.
pub fn parse_key(raw: &str) -> Result<(String, Operator), QueryError> {
    let Some(open) = raw.find('{') else {
        return Ok((raw.to_string(), Operator::Equal));
    };
    let name = &raw[..open];
    let rest = &raw[open + 1..];
    let token = rest.strip_suffix('}').ok_or_else(|| QueryError::UnknownOperator(rest.to_string()))?;
    if token.is_empty() {
        return Ok((name.to_string(), Operator::Equal));
    }
    Ok((name.to_string(), token.parse()?))
}

/// Inverse of [`parse_key`]; equality is written without braces.
#[must_use]
pub fn format_key(path: &str, op: Operator) -> String {
    match op {
        Operator::Equal => path.to_string(),
        other => format_key_explicit(path, other),
    }
}

#[must_use]
pub fn format_key_explicit(path: &str, op: Operator) -> String {
    format!("{path}{{{}}}", op.token())
}

/// Builds a typed [`Filter`] from the `"field{op}" -> raw value` map encoding.
///
/// Every path is resolved against `E` and every value coerced to the resolved type;
/// `in` values are split on commas. Entries are processed in key order.
///
/// # Errors
/// The first key, path or coercion failure, or `InSetTooLarge` when an `in`
/// list has more members than `max_in_set`.
pub fn parse_string_filter<E, K, V>(
    ctx: &QueryContext,
    values: impl IntoIterator<Item = (K, V)>,
) -> Result<Filter, QueryError>
where
    E: Entity,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let sorted: BTreeMap<String, String> =
        values.into_iter().map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())).collect();
    let mut out = Filter::new();
    for (key, raw) in &sorted {
        let (name, op) = parse_key(key)?;
        let ty = ctx.resolve::<E>(&name)?;
        let value = if op == Operator::In {
            let len = raw.split(',').count();
            let max = ctx.config().max_in_set;
            if len > max {
                return Err(QueryError::InSetTooLarge { field: name, len, max });
            }
            coerce_in(&ty, raw)?
        } else {
            coerce(&ty, raw)?
        };
        out.push(FieldFilter { field: name, op, value });
    }
    Ok(out)
}

/// Parses a flat JSON object of `"field{op}": "value"` pairs, see [`parse_string_filter`].
///
/// # Errors
/// Malformed JSON or any [`parse_string_filter`] failure.
pub fn parse_filter_json<E: Entity>(ctx: &QueryContext, json: &str) -> Result<Filter, QueryError> {
    let map: BTreeMap<String, String> = serde_json::from_str(json)?;
    parse_string_filter::<E, _, _>(ctx, map)
}
