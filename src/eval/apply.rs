use serde::Serialize;
use serde_json::Value as Json;
use std::cmp::Ordering;

use super::compare::{compare_sort_keys, matches};
use super::path::{collect_leaves, first_leaf};
use crate::context::QueryContext;
use crate::errors::QueryError;
use crate::query::{FieldFilter, Filter, Order, Pagination, Query, Sort};
use crate::schema::Entity;
use crate::utils::num::{usize_to_u64, window_end};
use crate::value::Value;

/// Keeps the items that pass every filter, in their original order.
///
/// A filter on a fanned-out path passes if any reachable value satisfies it.
///
/// # Errors
/// `InvalidPath` for a filter path absent from `E`, or a serialization failure.
pub fn apply_filter<E>(ctx: &QueryContext, filter: &Filter, items: Vec<E>) -> Result<Vec<E>, QueryError>
where
    E: Entity + Serialize,
{
    if filter.is_empty() {
        return Ok(items);
    }
    validate_paths::<E>(ctx, filter.iter().map(|f| f.field.as_str()))?;
    let schema = E::schema();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let record = serde_json::to_value(&item)?;
        if filter.iter().all(|f| passes(&record, schema, f)) {
            out.push(item);
        }
    }
    Ok(out)
}

fn passes(record: &Json, schema: &crate::schema::Schema, f: &FieldFilter) -> bool {
    collect_leaves(record, schema, &f.field).iter().any(|leaf| matches(f.op, leaf, &f.value))
}

/// Stable multi-key sort; the first key is primary, later keys break ties.
/// Only the first value reachable through a fanned-out path is used.
///
/// # Errors
/// `InvalidPath` for a sort key absent from `E`, or a serialization failure.
pub fn apply_sort<E>(ctx: &QueryContext, sort: &Sort, items: Vec<E>) -> Result<Vec<E>, QueryError>
where
    E: Entity + Serialize,
{
    if sort.is_empty() {
        return Ok(items);
    }
    validate_paths::<E>(ctx, sort.iter().map(|s| s.key.as_str()))?;
    let schema = E::schema();
    let mut keyed: Vec<(Vec<Option<Value>>, E)> = Vec::with_capacity(items.len());
    for item in items {
        let record = serde_json::to_value(&item)?;
        let keys = sort.iter().map(|s| first_leaf(&record, schema, &s.key)).collect();
        keyed.push((keys, item));
    }
    keyed.sort_by(|(a, _), (b, _)| {
        for (i, s) in sort.iter().enumerate() {
            let ord = compare_sort_keys(a[i].as_ref(), b[i].as_ref());
            if ord != Ordering::Equal {
                return if s.order == Order::Asc { ord } else { ord.reverse() };
            }
        }
        Ordering::Equal
    });
    Ok(keyed.into_iter().map(|(_, item)| item).collect())
}

/// Filter, then sort, then slice the pagination window.
///
/// # Errors
/// See [`apply_filter`] and [`apply_sort`].
pub fn apply_query<E>(ctx: &QueryContext, query: &Query, items: Vec<E>) -> Result<Vec<E>, QueryError>
where
    E: Entity + Serialize,
{
    let items = apply_filter(ctx, &query.filter, items)?;
    let items = apply_sort(ctx, &query.sort, items)?;
    Ok(paginate(&query.pagination, items))
}

fn paginate<E>(p: &Pagination, mut items: Vec<E>) -> Vec<E> {
    let window = p.window(items.len());
    items.truncate(window.end);
    items.drain(..window.start);
    items
}

/// Runs `query` against a source that can only hand out pages in storage order.
///
/// Pages of `limit` items are fetched at an advancing offset and filtered locally until
/// the source runs dry (a short page) or enough matches exist to fill
/// `offset + limit`; the accumulated matches are then sorted and windowed with
/// [`apply_query`]. With `limit == 0` a single fetch is expected to return everything.
/// Fetch errors abort immediately and are never retried.
///
/// # Errors
/// The first fetch error, or any evaluation error converted into `Err`.
pub fn apply_query_with_next<E, F, Err>(ctx: &QueryContext, query: &Query, mut fetch: F) -> Result<Vec<E>, Err>
where
    E: Entity + Serialize,
    F: FnMut(&Query) -> Result<Vec<E>, Err>,
    Err: From<QueryError>,
{
    let limit = query.pagination.limit;
    let target = window_end(query.pagination.offset, limit);
    let mut page_query = query.clone();
    let mut cursor = 0u64;
    let mut out: Vec<E> = Vec::new();
    loop {
        page_query.pagination = Pagination { offset: cursor, limit };
        let page = fetch(&page_query)?;
        let fetched = usize_to_u64(page.len());
        cursor = cursor.saturating_add(fetched);
        out.extend(apply_filter(ctx, &query.filter, page)?);
        log::debug!("page fetch at {} returned {fetched} items, {} matched so far", page_query.pagination.offset, out.len());

        let Some(target) = target else {
            break;
        };
        if fetched < limit || out.len() >= target {
            break;
        }
    }
    Ok(apply_query(ctx, query, out)?)
}

fn validate_paths<'a, E: Entity>(ctx: &QueryContext, paths: impl Iterator<Item = &'a str>) -> Result<(), QueryError> {
    for p in paths {
        ctx.resolve::<E>(p)?;
    }
    Ok(())
}
