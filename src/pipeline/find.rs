use bson::{Bson, Document, doc};
use std::collections::HashSet;

use super::project::backend_path;
use crate::config::QueryConfig;
use crate::context::QueryContext;
use crate::errors::QueryError;
use crate::query::{FieldFilter, Filter, Operator, Query, Sort};
use crate::schema::{FieldType, Schema};
use crate::value::Value;

/// Arguments for a plain `find` against one collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindSpec {
    pub filter: Document,
    pub sort: Document,
    pub skip: u64,
    /// Zero means unlimited.
    pub limit: u64,
}

/// Compiles `query` against `schema` into find arguments.
///
/// # Errors
/// `InvalidPath` for any filter or sort path absent from `schema`.
pub fn compile_find(ctx: &QueryContext, query: &Query, schema: &'static Schema) -> Result<FindSpec, QueryError> {
    Ok(FindSpec {
        filter: compile_filter(ctx, &query.filter, schema)?,
        sort: compile_sort(ctx, &query.sort, schema)?,
        skip: query.pagination.offset,
        limit: query.pagination.limit,
    })
}

/// Match document for `filter`.
///
/// Clauses on distinct keys are merged into one document; if two clauses would
/// share a key (two bounds on one field, two null-aware `in`s) they are wrapped
/// in `$and` instead so that neither overwrites the other.
///
/// # Errors
/// `InvalidPath` for a filter path absent from `schema`.
pub fn compile_filter(ctx: &QueryContext, filter: &Filter, schema: &'static Schema) -> Result<Document, QueryError> {
    let mut clauses = Vec::with_capacity(filter.len());
    for f in filter {
        let ty = ctx.resolve_in(schema, &f.field)?;
        clauses.push(clause(ctx.config(), f, &ty));
    }
    Ok(conjoin(clauses))
}

/// # Errors
/// `InvalidPath` for a sort key absent from `schema`.
pub fn compile_sort(ctx: &QueryContext, sort: &Sort, schema: &'static Schema) -> Result<Document, QueryError> {
    let mut out = Document::new();
    for s in sort {
        ctx.resolve_in(schema, &s.key)?;
        out.insert(backend_path(&s.key), s.order.direction());
    }
    Ok(out)
}

fn conjoin(clauses: Vec<Document>) -> Document {
    let mut seen = HashSet::new();
    let distinct = clauses.iter().flat_map(Document::keys).all(|k| seen.insert(k.as_str()));
    if distinct {
        clauses.into_iter().flatten().collect()
    } else {
        doc! { "$and": clauses }
    }
}

fn clause(config: &QueryConfig, f: &FieldFilter, ty: &FieldType) -> Document {
    let key = backend_path(&f.field);
    match f.op {
        Operator::In => in_clause(key, &f.value),
        Operator::SubString if ty.is_numeric() => {
            if config.numeric_substring {
                numeric_contains(&key, &f.value)
            } else {
                field_op(key, "$eq", Bson::from(&f.value))
            }
        }
        Operator::SubString => {
            let mut re = Document::new();
            re.insert("$regex", regex::escape(&f.value.to_string()));
            re.insert("$options", "i");
            single(key, re)
        }
        op => field_op(key, backend_operator(op), Bson::from(&f.value)),
    }
}

const fn backend_operator(op: Operator) -> &'static str {
    match op {
        Operator::Equal => "$eq",
        Operator::NotEqual => "$ne",
        Operator::Greater => "$gt",
        Operator::GreaterOrEqual => "$gte",
        Operator::Less => "$lt",
        Operator::LessOrEqual => "$lte",
        Operator::In => "$in",
        Operator::SubString => "$regex",
    }
}

fn in_clause(key: String, value: &Value) -> Document {
    let members = value.members();
    let non_null: Vec<Bson> = members.iter().filter(|m| !m.is_null()).map(Bson::from).collect();
    if non_null.len() == members.len() {
        return field_op(key, "$in", Bson::Array(non_null));
    }
    let either = vec![single(key.clone(), Bson::Null), field_op(key, "$in", Bson::Array(non_null))];
    doc! { "$or": either }
}

// Stringify the stored number and look for the literal's digits in it.
fn numeric_contains(key: &str, value: &Value) -> Document {
    doc! {
        "$expr": {
            "$gte": [
                { "$indexOfCP": [{ "$toString": format!("${key}") }, value.to_string()] },
                0,
            ]
        }
    }
}

fn field_op(key: String, op: &str, value: Bson) -> Document {
    let mut inner = Document::new();
    inner.insert(op, value);
    single(key, inner)
}

fn single(key: String, value: impl Into<Bson>) -> Document {
    let mut d = Document::new();
    d.insert(key, value);
    d
}
