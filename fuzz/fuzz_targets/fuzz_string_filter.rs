#![no_main]
use libfuzzer_sys::fuzz_target;
use querylink::query::parse_string_filter;
use querylink::{Entity, FieldType, QueryContext, Schema};
use std::sync::LazyLock;

struct Target;

impl Entity for Target {
    fn schema() -> &'static Schema {
        static S: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new("Target")
                .field("id", FieldType::Int)
                .field("name", FieldType::String)
                .field("score", FieldType::optional(FieldType::Float))
                .field("flags", FieldType::list(FieldType::Bool))
                .field("seen", FieldType::Timestamp)
                .field("owner", FieldType::uuid())
        });
        &S
    }
}

static CTX: LazyLock<QueryContext> = LazyLock::new(QueryContext::default);

fuzz_target!(|pairs: Vec<(String, String)>| {
    if pairs.len() > 64 { return; }
    // errors are fine, panics are not
    let _ = parse_string_filter::<Target, _, _>(&CTX, pairs);
});
