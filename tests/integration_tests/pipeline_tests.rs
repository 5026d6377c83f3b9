use bson::{Bson, Document, doc};
use querylink::pipeline::project;
use querylink::query::parse_string_filter;
use querylink::utils::devlog;
use querylink::{
    Entity, FieldFilter, FieldLink, Fields, Filter, LinkGraph, ModelLink, Operator, Query, QueryConfig, QueryContext, QueryError, Sort,
    SortField, compile_aggregate, compile_find, full_pipeline,
};

use super::support::{Author, Bag, Item, Review, library};

fn head(stage: &Document) -> &str {
    stage.keys().next().map_or("", String::as_str)
}

fn heads(stages: &[Document]) -> Vec<&str> {
    stages.iter().map(head).collect()
}

fn child_pipeline(stage: &Document) -> Vec<Document> {
    stage
        .get_document("$lookup")
        .unwrap()
        .get_array("pipeline")
        .unwrap()
        .iter()
        .filter_map(Bson::as_document)
        .cloned()
        .collect()
}

#[test]
fn find_compiles_in_with_null_to_or() {
    let ctx = QueryContext::default();
    let filter = parse_string_filter::<Bag, _, _>(&ctx, [("nick{in}", "null,bob,eve")]).unwrap();
    let spec = compile_find(&ctx, &Query::new().filter(filter), Bag::schema()).unwrap();
    assert_eq!(spec.filter, doc! { "$or": [{ "nick": null }, { "nick": { "$in": ["bob", "eve"] } }] });

    let filter = parse_string_filter::<Bag, _, _>(&ctx, [("id{in}", "1,2")]).unwrap();
    let spec = compile_find(&ctx, &Query::new().filter(filter), Bag::schema()).unwrap();
    assert_eq!(spec.filter, doc! { "_id": { "$in": [1i64, 2i64] } });
}

#[test]
fn find_applies_id_alias_to_nested_paths_and_sort() {
    let ctx = QueryContext::default();
    let q = Query::new()
        .filter(Filter::from(vec![FieldFilter::new("books.id", Operator::Greater, 10i64)]))
        .sort(Sort::from(vec![SortField::desc("id")]))
        .paginate(5, 0);
    let spec = compile_find(&ctx, &q, Author::schema()).unwrap();
    assert_eq!(spec.filter, doc! { "books._id": { "$gt": 10i64 } });
    assert_eq!(spec.sort, doc! { "_id": -1 });
    assert_eq!((spec.skip, spec.limit), (5, 0));
}

#[test]
fn numeric_substring_can_be_switched_off() {
    let q = Query::new().filter(Filter::from(vec![FieldFilter::new("id", Operator::SubString, 12i64)]));
    let on = compile_find(&QueryContext::default(), &q, Item::schema()).unwrap();
    assert!(on.filter.contains_key("$expr"));

    let off_cfg = QueryConfig::from_toml_str("numeric_substring = false").unwrap();
    let off = compile_find(&QueryContext::new(off_cfg), &q, Item::schema()).unwrap();
    assert_eq!(off.filter, doc! { "_id": { "$eq": 12i64 } });
}

#[test]
fn aggregate_expands_only_requested_joins() {
    let ctx = QueryContext::default();
    let graph = library();
    let q = Query::new()
        .filter(Filter::from(vec![FieldFilter::new("books.0.latest_review.stars", Operator::GreaterOrEqual, 4i64)]))
        .sort(Sort::from(vec![SortField::asc("name")]))
        .paginate(0, 10);
    let stages = compile_aggregate(&ctx, &q, &graph, "author").unwrap();
    assert_eq!(heads(&stages), ["$sort", "$set", "$lookup", "$project", "$match", "$sort", "$limit"]);
    assert_eq!(stages[1], doc! { "$set": { "book_ids": { "$ifNull": ["$book_ids", []] } } });
    assert_eq!(stages[3], doc! { "$project": { "books": 1, "name": 1 } });
    assert_eq!(stages[4], doc! { "$match": { "books.0.latest_review.stars": { "$gte": 4i64 } } });
    assert_eq!(stages[5], doc! { "$sort": { "name": 1, "_id": -1 } });

    // books: match by membership, then the latest-review join, then the child projection
    let books = child_pipeline(&stages[2]);
    assert_eq!(heads(&books), ["$match", "$lookup", "$set", "$project"]);
    assert_eq!(books[0], doc! { "$match": { "$expr": { "$in": ["$_id", "$$tgr"] } } });
    assert_eq!(books[3], doc! { "$project": { "latest_review": 1 } });

    // latest review: match by equality, newest first, keep one, project stars
    let reviews = child_pipeline(&books[1]);
    assert_eq!(
        reviews,
        vec![
            doc! { "$match": { "$expr": { "$eq": ["$book_id", "$$tgr"] } } },
            doc! { "$sort": { "_id": -1 } },
            doc! { "$limit": 1 },
            doc! { "$project": { "stars": 1 } },
        ]
    );
}

#[test]
fn aggregate_without_joins_is_flat() {
    let ctx = QueryContext::default();
    let q = Query::new().filter(Filter::from(vec![FieldFilter::eq("name", "x")])).paginate(3, 0);
    let stages = compile_aggregate(&ctx, &q, &library(), "author").unwrap();
    assert_eq!(
        stages,
        vec![
            doc! { "$sort": { "_id": -1 } },
            doc! { "$project": { "name": 1 } },
            doc! { "$match": { "name": { "$eq": "x" } } },
            doc! { "$skip": 3i64 },
        ]
    );
}

#[test]
fn aggregate_is_traced_per_thread() {
    let ctx = QueryContext::default();
    let (stages, traces) = devlog::capture(|| compile_aggregate(&ctx, &Query::new(), &library(), "author"));
    assert_eq!(stages.unwrap().len(), 1);
    assert_eq!(traces, vec![r#"author: [{"$sort":{"_id":-1}}]"#.to_string()]);
}

#[test]
fn full_pipeline_loads_the_whole_tree() {
    let stages = full_pipeline(&library(), "author").unwrap();
    assert_eq!(heads(&stages), ["$set", "$lookup"]);
    let books = child_pipeline(&stages[1]);
    assert_eq!(heads(&books), ["$match", "$lookup", "$set"]);
    let reviews = child_pipeline(&books[1]);
    assert_eq!(heads(&reviews), ["$match", "$sort", "$limit"]);
}

#[test]
fn cyclic_graph_fails_fast() {
    let looped = library().with(
        ModelLink::new::<Review>("review", "reviews")
            .link(FieldLink::single("author", "author").id_name("author_id")),
    );
    assert!(matches!(full_pipeline(&looped, "author"), Err(QueryError::CyclicLinkGraph(_))));
    assert!(matches!(looped.validate("author"), Err(QueryError::CyclicLinkGraph(_))));

    // a field-driven expansion that stays clear of the loop still compiles
    let fields: Fields = ["books.title"].into_iter().collect();
    assert!(project(&fields, &looped, "author").is_ok());
}

#[test]
fn unknown_root_or_path_is_an_error() {
    let ctx = QueryContext::default();
    let graph = LinkGraph::new();
    assert!(matches!(compile_aggregate(&ctx, &Query::new(), &graph, "ghost"), Err(QueryError::UnknownModel(_))));

    let q = Query::new().sort(Sort::from(vec![SortField::asc("books.pages")]));
    match compile_aggregate(&ctx, &q, &library(), "author") {
        Err(QueryError::InvalidPath(seg)) => assert_eq!(seg, "pages"),
        other => panic!("unexpected: {other:?}"),
    }
}
