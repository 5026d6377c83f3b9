use bson::{Bson, Document, doc};

use super::Pipeline;

/// Variable bound to the local key inside a join's child pipeline.
const LOCAL_KEY_VAR: &str = "tgr";

/// Join attaching every child whose `link_id_name` is contained in the local
/// `id_name` list. A missing local list is treated as empty.
pub(crate) fn lookup_many(
    collection: &str,
    id_name: &str,
    link_id_name: &str,
    resolved_name: &str,
    children: Pipeline,
) -> Pipeline {
    let matcher = join_match("$in", link_id_name);
    let mut default_ids = Document::new();
    default_ids.insert(id_name, doc! { "$ifNull": [format!("${id_name}"), Bson::Array(Vec::new())] });
    vec![
        doc! { "$set": default_ids },
        lookup_stage(collection, id_name, resolved_name, matcher, children),
    ]
}

/// Join attaching the first child whose `link_id_name` equals the local `id_name`,
/// unwrapped from the lookup array. No match leaves the field absent.
pub(crate) fn lookup_single(
    collection: &str,
    id_name: &str,
    link_id_name: &str,
    resolved_name: &str,
    children: Pipeline,
) -> Pipeline {
    let matcher = join_match("$eq", link_id_name);
    let mut first = Document::new();
    first.insert(resolved_name, doc! { "$arrayElemAt": [format!("${resolved_name}"), 0] });
    vec![
        lookup_stage(collection, id_name, resolved_name, matcher, children),
        doc! { "$set": first },
    ]
}

/// Child pipeline prefix keeping only the match with the greatest primary key.
pub(crate) fn last_only() -> Pipeline {
    vec![doc! { "$sort": { "_id": -1 } }, doc! { "$limit": 1 }]
}

fn join_match(op: &str, link_id_name: &str) -> Document {
    let mut expr = Document::new();
    expr.insert(op, vec![Bson::String(format!("${link_id_name}")), Bson::String(format!("$${LOCAL_KEY_VAR}"))]);
    doc! { "$match": { "$expr": expr } }
}

fn lookup_stage(collection: &str, id_name: &str, resolved_name: &str, matcher: Document, children: Pipeline) -> Document {
    let mut vars = Document::new();
    vars.insert(LOCAL_KEY_VAR, format!("${id_name}"));
    let mut pipeline = Vec::with_capacity(children.len() + 1);
    pipeline.push(Bson::Document(matcher));
    pipeline.extend(children.into_iter().map(Bson::Document));
    doc! {
        "$lookup": {
            "from": collection,
            "let": vars,
            "pipeline": pipeline,
            "as": resolved_name,
        }
    }
}
