use bson::{Document, doc};

use super::Pipeline;
use super::lookup::{last_only, lookup_many, lookup_single};
use crate::errors::QueryError;
use crate::link::{BACKEND_ID, FieldLink, LinkGraph, LinkKind, ModelLink, enter};
use crate::query::Fields;

/// Rewrites primary-key segments (`id`) to the backend's reserved name.
#[must_use]
pub fn backend_path(path: &str) -> String {
    path.split('.').map(|seg| if seg == "id" { BACKEND_ID } else { seg }).collect::<Vec<_>>().join(".")
}

/// Drops list index segments: `posts.0.title` projects as `posts.title`.
pub(crate) fn clean_project_path(path: &str) -> String {
    path.split('.').filter(|seg| !is_index(seg)).collect::<Vec<_>>().join(".")
}

/// Drops one leading index segment: `0.title` becomes `title`.
fn clean_first_part(path: &str) -> String {
    match path.split_once('.') {
        Some((head, rest)) if is_index(head) => rest.to_string(),
        _ => path.to_string(),
    }
}

fn is_index(seg: &str) -> bool {
    !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit())
}

/// Join and projection stages fetching only `fields` of the `root` model.
///
/// Every link whose resolved name prefixes a requested field is expanded, and the
/// fields under it are projected inside the child pipeline recursively. Whatever
/// is left, plus the expanded link names, ends up in a trailing `$project`.
///
/// # Errors
/// `UnknownModel` for a dangling link target, `CyclicLinkGraph` when expansion
/// re-enters a model that is already being expanded.
pub fn project(fields: &Fields, graph: &LinkGraph, root: &str) -> Result<Pipeline, QueryError> {
    let mut stack = Vec::new();
    project_model(fields, graph, graph.get(root)?, &mut stack)
}

fn project_model<'g>(
    fields: &Fields,
    graph: &'g LinkGraph,
    model: &'g ModelLink,
    stack: &mut Vec<&'g str>,
) -> Result<Pipeline, QueryError> {
    enter(stack, &model.name)?;
    let mut stages = Pipeline::new();
    let mut remaining = fields.clone();
    let mut projected = Fields::new();
    for link in &model.resolvers {
        let (grouped, rest) = remaining.group(&link.resolved_name);
        remaining = rest;
        if grouped.is_empty() {
            continue;
        }
        let grouped = if link.kind == LinkKind::Array {
            grouped.iter().map(|f| clean_first_part(f)).collect()
        } else {
            grouped
        };
        let child = graph.get(&link.target)?;
        let children = project_model(&grouped, graph, child, stack)?;
        stages.extend(join(link, child, children));
        projected.push(link.resolved_name.as_str());
    }
    stack.pop();

    projected.extend(remaining);
    if let Some(stage) = project_stage(&projected) {
        stages.push(stage);
    }
    Ok(stages)
}

/// Expands every link reachable from `model` regardless of requested fields.
pub(crate) fn expand_all<'g>(
    graph: &'g LinkGraph,
    model: &'g ModelLink,
    stack: &mut Vec<&'g str>,
) -> Result<Pipeline, QueryError> {
    enter(stack, &model.name)?;
    let mut stages = Pipeline::new();
    for link in &model.resolvers {
        let child = graph.get(&link.target)?;
        let children = expand_all(graph, child, stack)?;
        stages.extend(join(link, child, children));
    }
    stack.pop();
    Ok(stages)
}

fn join(link: &FieldLink, child: &ModelLink, children: Pipeline) -> Pipeline {
    let id_name = link.backend_id_name();
    let link_id_name = link.backend_link_id_name();
    match link.kind {
        LinkKind::Array => lookup_many(&child.collection, &id_name, &link_id_name, &link.resolved_name, children),
        LinkKind::Single => lookup_single(&child.collection, &id_name, &link_id_name, &link.resolved_name, children),
        LinkKind::SingleLast => {
            let mut pipeline = last_only();
            pipeline.extend(children);
            lookup_single(&child.collection, &id_name, &link_id_name, &link.resolved_name, pipeline)
        }
    }
}

fn project_stage(fields: &Fields) -> Option<Document> {
    let cleaned = fields.iter().map(|f| clean_project_path(&backend_path(f))).collect::<Fields>().unique();
    let mut projection = Document::new();
    for path in &cleaned {
        // a parent path already keeps the whole subtree
        if cleaned.iter().any(|other| other != path && path.starts_with(other.as_str()) && path[other.len()..].starts_with('.')) {
            continue;
        }
        projection.insert(path.as_str(), 1);
    }
    if projection.is_empty() { None } else { Some(doc! { "$project": projection }) }
}
