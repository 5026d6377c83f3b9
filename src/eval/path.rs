use chrono::{DateTime, Utc};
use serde_json::Value as Json;

use crate::schema::{FieldType, Schema};
use crate::value::Value;

/// Every leaf value reachable through `path` in a serialized record.
///
/// Lists without an explicit index fan out over all elements; a path ending on a list
/// yields its elements. An index past the end yields nothing.
pub(crate) fn collect_leaves(record: &Json, schema: &Schema, path: &str) -> Vec<Value> {
    let parts: Vec<&str> = path.split('.').collect();
    let mut out = Vec::new();
    walk_fields(record, schema, &parts, &mut out);
    out
}

/// First reachable leaf, used as the sort key.
pub(crate) fn first_leaf(record: &Json, schema: &Schema, path: &str) -> Option<Value> {
    collect_leaves(record, schema, path).into_iter().next()
}

fn walk_fields(node: &Json, schema: &Schema, parts: &[&str], out: &mut Vec<Value>) {
    let Some((head, rest)) = parts.split_first() else {
        return;
    };
    let Json::Object(obj) = node else {
        return;
    };
    let Some(field) = schema.get(head) else {
        return;
    };
    let child = obj.get(field.name).unwrap_or(&Json::Null);
    walk(child, &field.ty, rest, out);
}

fn walk(node: &Json, ty: &FieldType, parts: &[&str], out: &mut Vec<Value>) {
    match ty {
        FieldType::Optional(inner) => {
            if node.is_null() {
                if parts.is_empty() {
                    out.push(Value::Null);
                }
                return;
            }
            walk(node, inner, parts, out);
        }
        FieldType::List(elem) => {
            let Json::Array(items) = node else {
                return;
            };
            if let Some(idx) = parts.first().and_then(|p| p.parse::<usize>().ok()) {
                if let Some(item) = items.get(idx) {
                    walk(item, elem, &parts[1..], out);
                }
                return;
            }
            for item in items {
                walk(item, elem, parts, out);
            }
        }
        FieldType::Struct(schema_ref) => walk_fields(node, schema_ref(), parts, out),
        leaf => {
            if parts.is_empty()
                && let Some(v) = read_leaf(node, leaf)
            {
                out.push(v);
            }
        }
    }
}

fn read_leaf(node: &Json, ty: &FieldType) -> Option<Value> {
    if node.is_null() {
        return Some(Value::Null);
    }
    match ty {
        FieldType::Bool => node.as_bool().map(Value::Bool),
        FieldType::Int => node.as_i64().map(Value::Int),
        FieldType::Float => node.as_f64().map(Value::Float),
        FieldType::String => node.as_str().map(|s| Value::String(s.to_string())),
        FieldType::Timestamp => node
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|ts| Value::Timestamp(ts.with_timezone(&Utc))),
        FieldType::Custom(_) => read_untyped(node),
        _ => None,
    }
}

fn read_untyped(node: &Json) -> Option<Value> {
    match node {
        Json::Bool(b) => Some(Value::Bool(*b)),
        Json::Number(n) => n.as_i64().map(Value::Int).or_else(|| n.as_f64().map(Value::Float)),
        Json::String(s) => Some(Value::String(s.clone())),
        _ => None,
    }
}
