use proptest::prelude::*;
use querylink::query::{format_key, format_key_explicit, parse_key, parse_string_filter};
use querylink::{Operator, QueryContext, Value};

use crate::integration_tests::support::Item;

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,8}",
        (0u32..50).prop_map(|i| i.to_string()),
    ]
}

fn field_path() -> impl Strategy<Value = String> {
    ("[a-z_][a-z0-9_]{0,8}", prop::collection::vec(segment(), 0..4))
        .prop_map(|(head, rest)| std::iter::once(head).chain(rest).collect::<Vec<_>>().join("."))
}

proptest! {
    #![proptest_config(proptest::test_runner::Config {
        failure_persistence: Some(Box::new(proptest::test_runner::FileFailurePersistence::WithSource("proptest-regressions"))),
        cases: 64,
        .. proptest::test_runner::Config::default()
    })]

    #[test]
    fn prop_key_round_trip(path in field_path(), op in prop::sample::select(Operator::ALL.to_vec())) {
        prop_assert_eq!(parse_key(&format_key(&path, op)).unwrap(), (path.clone(), op));
        prop_assert_eq!(parse_key(&format_key_explicit(&path, op)).unwrap(), (path, op));
    }

    #[test]
    fn prop_int_literals_coerce_exactly(n in any::<i64>(), op in prop::sample::select(vec![Operator::Equal, Operator::Greater, Operator::LessOrEqual])) {
        let ctx = QueryContext::default();
        let key = format_key("id", op);
        let raw = n.to_string();
        let f = parse_string_filter::<Item, _, _>(&ctx, [(key.as_str(), raw.as_str())]).unwrap();
        let only = f.iter().next().unwrap();
        prop_assert_eq!(only.op, op);
        prop_assert_eq!(&only.value, &Value::Int(n));
    }

    #[test]
    fn prop_in_lists_keep_every_member(ns in prop::collection::vec(any::<i32>(), 1..20)) {
        let ctx = QueryContext::default();
        let raw = ns.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        let f = parse_string_filter::<Item, _, _>(&ctx, [("id{in}", raw.as_str())]).unwrap();
        let expected = Value::List(ns.iter().map(|n| Value::Int(i64::from(*n))).collect());
        prop_assert_eq!(&f.iter().next().unwrap().value, &expected);
    }
}
