use querylink::query::{format_key, parse_filter_json, parse_key, parse_string_filter};
use querylink::{
    FieldFilter, Fields, Operator, Order, Query, QueryConfig, QueryContext, QueryError, Sort, Value, apply_filter,
};

use super::support::{Bag, Item};

#[test]
fn string_filter_coerces_to_field_types() {
    let ctx = QueryContext::default();
    let f = parse_string_filter::<Bag, _, _>(
        &ctx,
        [("names.1{lte}", "7"), ("active", "FALSE"), ("tags.weight{gt}", "0.5"), ("nick{in}", "null,x")],
    )
    .unwrap();
    // entries come out in key order
    let expected = vec![
        FieldFilter::new("active", Operator::Equal, false),
        FieldFilter::new("names.1", Operator::LessOrEqual, 7i64),
        FieldFilter::new("nick", Operator::In, Value::List(vec![Value::Null, Value::from("x")])),
        FieldFilter::new("tags.weight", Operator::Greater, 0.5),
    ];
    assert_eq!(f.iter().cloned().collect::<Vec<_>>(), expected);
    assert_eq!(f.operators().get("nick"), Some(&Operator::In));
}

#[test]
fn string_filter_reports_each_failure_kind() {
    let ctx = QueryContext::default();
    assert!(matches!(
        parse_string_filter::<Bag, _, _>(&ctx, [("id{between}", "1")]),
        Err(QueryError::UnknownOperator(op)) if op == "between"
    ));
    assert!(matches!(
        parse_string_filter::<Bag, _, _>(&ctx, [("names.x", "1")]),
        Err(QueryError::InvalidPath(seg)) if seg == "x"
    ));
    assert!(matches!(parse_string_filter::<Bag, _, _>(&ctx, [("active", "yes")]), Err(QueryError::BadBoolean(_))));
    assert!(matches!(parse_string_filter::<Bag, _, _>(&ctx, [("id", "1.5")]), Err(QueryError::NumericParse { .. })));
    assert!(matches!(parse_string_filter::<Bag, _, _>(&ctx, [("seen", "yesterday")]), Err(QueryError::TimestampParse(_))));
    assert!(matches!(parse_string_filter::<Bag, _, _>(&ctx, [("tags", "x")]), Err(QueryError::UnsupportedFieldType(_))));
}

#[test]
fn json_filter_goes_through_the_same_path() {
    let ctx = QueryContext::default();
    let f = parse_filter_json::<Item>(&ctx, r#"{"name{substr}": "ap", "id{gte}": "2"}"#).unwrap();
    assert_eq!(f.len(), 2);
    assert_eq!(f.fields(), ["id", "name"].into_iter().collect::<Fields>());
    assert!(matches!(parse_filter_json::<Item>(&ctx, "[1]"), Err(QueryError::Serialize(_))));
}

#[test]
fn oversized_in_sets_are_rejected_not_truncated() {
    let ctx = QueryContext::new(QueryConfig { max_in_set: 2, ..QueryConfig::default() });
    let err = parse_string_filter::<Item, _, _>(&ctx, [("id{in}", "1,2,3,4")]).unwrap_err();
    assert!(matches!(err, QueryError::InSetTooLarge { ref field, len: 4, max: 2 } if field == "id"));
    let f = parse_string_filter::<Item, _, _>(&ctx, [("id{in}", "1,2")]).unwrap();
    assert_eq!(f.iter().next().unwrap().value, Value::List(vec![Value::Int(1), Value::Int(2)]));
}

#[test]
fn every_in_member_up_to_the_default_limit_is_kept() {
    let ctx = QueryContext::default();
    let raw = (1..=1000).map(|i: i64| i.to_string()).collect::<Vec<_>>().join(",");
    let f = parse_string_filter::<Item, _, _>(&ctx, [("id{in}", raw.as_str())]).unwrap();
    let hit = apply_filter(&ctx, &f, vec![Item::new(1000, "last")]).unwrap();
    assert_eq!(hit.len(), 1);

    let over = format!("{raw},1001");
    assert!(matches!(
        parse_string_filter::<Item, _, _>(&ctx, [("id{in}", over.as_str())]),
        Err(QueryError::InSetTooLarge { len: 1001, max: 1000, .. })
    ));
}

#[test]
fn keys_format_and_parse() {
    assert_eq!(format_key("a.b", Operator::Equal), "a.b");
    assert_eq!(format_key("a.b", Operator::SubString), "a.b{substr}");
    assert_eq!(parse_key("a.b{gte}").unwrap(), ("a.b".to_string(), Operator::GreaterOrEqual));
    assert!(matches!(parse_key("a{gt"), Err(QueryError::UnknownOperator(_))));
}

#[test]
fn sort_edits_in_place() {
    let mut s = Sort::new();
    s.set("name", Order::Asc);
    s.set("id", Order::Desc);
    s.set("name", Order::Desc);
    assert_eq!(s.len(), 2);
    assert_eq!(s.get("name"), Some(Order::Desc));
    assert_eq!(s.get("missing"), None);
    assert_eq!(s.fields(), ["name", "id"].into_iter().collect::<Fields>());
}

#[test]
fn context_resolution_is_cached() {
    let ctx = QueryContext::default();
    let q = Query::new().filter(parse_string_filter::<Item, _, _>(&ctx, [("name", "x"), ("id", "1")]).unwrap());
    assert_eq!(q.fields().len(), 2);
    assert_eq!(ctx.cache().len(), 2);
    ctx.resolve::<Item>("name").unwrap();
    assert_eq!(ctx.cache().len(), 2);
}

mod twins {
    use querylink::{Entity, FieldType, Schema};
    use std::sync::LazyLock;

    pub struct Counted;
    impl Entity for Counted {
        fn schema() -> &'static Schema {
            static S: LazyLock<Schema> = LazyLock::new(|| Schema::new("Doc").field("x", FieldType::Int));
            &S
        }
    }

    pub struct Labelled;
    impl Entity for Labelled {
        fn schema() -> &'static Schema {
            static S: LazyLock<Schema> = LazyLock::new(|| Schema::new("Doc").field("x", FieldType::String));
            &S
        }
    }
}

#[test]
fn schemas_sharing_a_name_resolve_independently() {
    let ctx = QueryContext::default();
    let ints = parse_string_filter::<twins::Counted, _, _>(&ctx, [("x", "7")]).unwrap();
    assert_eq!(ints.iter().next().unwrap().value, Value::Int(7));
    let text = parse_string_filter::<twins::Labelled, _, _>(&ctx, [("x", "hello")]).unwrap();
    assert_eq!(text.iter().next().unwrap().value, Value::from("hello"));
}
