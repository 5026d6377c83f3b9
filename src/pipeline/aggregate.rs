use bson::{Document, doc};

use super::Pipeline;
use super::find::{compile_filter, compile_sort};
use super::project::{expand_all, project};
use crate::context::QueryContext;
use crate::errors::QueryError;
use crate::link::{BACKEND_ID, LinkGraph};
use crate::query::Query;

/// Aggregation stages answering `query` against the `root` model of `graph`.
///
/// Stage order: newest-first `$sort`, the joins and `$project` needed for the
/// fields the query touches, `$match`, `$sort` with a newest-first tie-break,
/// `$skip`, `$limit`. Stages that would be empty are left out. Filter and sort
/// paths resolve against the root schema, which describes joined fields too.
///
/// # Errors
/// `InvalidPath`, `UnknownModel` or `CyclicLinkGraph`.
pub fn compile_aggregate(ctx: &QueryContext, query: &Query, graph: &LinkGraph, root: &str) -> Result<Pipeline, QueryError> {
    let model = graph.get(root)?;
    let mut stages = vec![newest_first()];
    stages.extend(project(&query.fields(), graph, root)?);

    let matcher = compile_filter(ctx, &query.filter, model.schema)?;
    if !matcher.is_empty() {
        stages.push(doc! { "$match": matcher });
    }

    let mut sort = compile_sort(ctx, &query.sort, model.schema)?;
    if !sort.is_empty() {
        if !sort.contains_key(BACKEND_ID) {
            sort.insert(BACKEND_ID, -1);
        }
        stages.push(doc! { "$sort": sort });
    }

    let p = query.pagination;
    if p.offset != 0 {
        stages.push(doc! { "$skip": count(p.offset) });
    }
    if p.limit != 0 {
        stages.push(doc! { "$limit": count(p.limit) });
    }

    log::debug!("compiled {} stages for {root}", stages.len());
    crate::pipeline_trace!(root, &stages);
    Ok(stages)
}

/// Stages joining every linked model reachable from `root`, for eager loading.
///
/// # Errors
/// `UnknownModel` or `CyclicLinkGraph`.
pub fn full_pipeline(graph: &LinkGraph, root: &str) -> Result<Pipeline, QueryError> {
    let mut stack = Vec::new();
    let stages = expand_all(graph, graph.get(root)?, &mut stack)?;
    crate::pipeline_trace!(root, &stages);
    Ok(stages)
}

fn newest_first() -> Document {
    doc! { "$sort": { "_id": -1 } }
}

// BSON has no unsigned integers.
fn count(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
