#![no_main]
use libfuzzer_sys::fuzz_target;
use querylink::query::parse_filter_json;
use querylink::{Entity, FieldType, Query, QueryContext, Schema, compile_find};
use std::sync::LazyLock;

struct Target;

impl Entity for Target {
    fn schema() -> &'static Schema {
        static S: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new("Target")
                .field("id", FieldType::Int)
                .field("name", FieldType::String)
                .field("tags", FieldType::list(FieldType::optional(FieldType::String)))
        });
        &S
    }
}

static CTX: LazyLock<QueryContext> = LazyLock::new(QueryContext::default);

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(filter) = parse_filter_json::<Target>(&CTX, s)
    {
        let _ = compile_find(&CTX, &Query::new().filter(filter), Target::schema());
    }
});
