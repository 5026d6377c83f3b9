#![no_main]
use libfuzzer_sys::fuzz_target;
use querylink::query::{format_key_explicit, parse_key};

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 { return; }
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok((path, op)) = parse_key(s)
    {
        // anything that parses must survive a format/parse cycle
        assert_eq!(parse_key(&format_key_explicit(&path, op)).ok(), Some((path, op)));
    }
});
