use proptest::prelude::*;
use querylink::{
    FieldFilter, Filter, Operator, Order, Query, QueryContext, Sort, SortField, apply_filter, apply_query, apply_sort,
};

use crate::integration_tests::support::{Item, ids};

fn item() -> impl Strategy<Value = Item> {
    (-50i64..50, "[a-c]{0,4}").prop_map(|(id, name)| Item { id, name })
}

fn id_filter() -> impl Strategy<Value = FieldFilter> {
    (
        prop::sample::select(vec![
            Operator::Equal,
            Operator::NotEqual,
            Operator::Greater,
            Operator::GreaterOrEqual,
            Operator::Less,
            Operator::LessOrEqual,
            Operator::SubString,
        ]),
        -50i64..50,
    )
        .prop_map(|(op, v)| FieldFilter::new("id", op, v))
}

fn name_filter() -> impl Strategy<Value = FieldFilter> {
    (prop::sample::select(vec![Operator::Equal, Operator::SubString, Operator::Greater]), "[a-c]{0,2}")
        .prop_map(|(op, v)| FieldFilter::new("name", op, v))
}

proptest! {
    #![proptest_config(proptest::test_runner::Config {
        failure_persistence: Some(Box::new(proptest::test_runner::FileFailurePersistence::WithSource("proptest-regressions"))),
        cases: 64,
        .. proptest::test_runner::Config::default()
    })]

    #[test]
    fn prop_filters_are_a_conjunction(x in item(), f1 in id_filter(), f2 in name_filter()) {
        let ctx = QueryContext::default();
        let passes = |fs: Vec<FieldFilter>| !apply_filter(&ctx, &Filter::from(fs), vec![x.clone()]).unwrap().is_empty();
        let both = passes(vec![f1.clone(), f2.clone()]);
        prop_assert_eq!(both, passes(vec![f1]) && passes(vec![f2]));
    }

    #[test]
    fn prop_pagination_clips_like_skip_take(len in 0usize..20, offset in 0u64..30, limit in 0u64..30) {
        let ctx = QueryContext::default();
        let data: Vec<Item> = (0..len).map(|i| Item { id: i64::try_from(i).unwrap(), name: String::new() }).collect();
        let out = apply_query(&ctx, &Query::new().paginate(offset, limit), data.clone()).unwrap();
        let take = if limit == 0 { usize::MAX } else { usize::try_from(limit).unwrap() };
        let expected: Vec<Item> = data.into_iter().skip(usize::try_from(offset).unwrap()).take(take).collect();
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn prop_sort_orders_and_keeps_items(data in prop::collection::vec(item(), 0..30), desc in any::<bool>()) {
        let ctx = QueryContext::default();
        let order = if desc { Order::Desc } else { Order::Asc };
        let sort = Sort::from(vec![SortField { key: "id".into(), order }]);
        let out = apply_sort(&ctx, &sort, data.clone()).unwrap();
        let got = ids(&out);
        let mut expected = ids(&data);
        expected.sort_unstable();
        if desc {
            expected.reverse();
        }
        prop_assert_eq!(got, expected);

        // equal ids keep their input order
        for w in out.windows(2) {
            if w[0].id == w[1].id {
                let first = data.iter().position(|i| i == &w[0]).unwrap();
                let second = data.iter().rposition(|i| i == &w[1]).unwrap();
                prop_assert!(first <= second);
            }
        }
    }
}
