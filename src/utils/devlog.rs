//! Traces of compiled pipelines. Every trace goes to the `querylink::pipeline` log
//! target; [`capture`] additionally collects the ones emitted on the calling thread.

use std::cell::RefCell;

thread_local! {
    static CAPTURED: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// Runs `f` and returns its result with every pipeline trace it emitted on this thread.
/// Nested captures see only their own traces.
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let outer = CAPTURED.with(|c| c.replace(Some(Vec::new())));
    let out = f();
    let lines = CAPTURED.with(|c| c.replace(outer)).unwrap_or_default();
    (out, lines)
}

#[doc(hidden)]
pub fn record(line: String) {
    CAPTURED.with(|c| {
        if let Some(lines) = c.borrow_mut().as_mut() {
            lines.push(line);
        }
    });
}

/// Compact JSON array of `stages`, as stage documents serialize through serde.
#[must_use]
pub fn render(stages: &[bson::Document]) -> String {
    serde_json::to_string(stages).unwrap_or_else(|e| format!("<unrenderable pipeline: {e}>"))
}

/// Logs a compiled pipeline as `label: [stages...]`.
#[macro_export]
macro_rules! pipeline_trace {
    ($label:expr, $stages:expr) => {{
        let line = format!("{}: {}", $label, $crate::utils::devlog::render($stages));
        ::log::log!(target: $crate::logger::PIPELINE_TARGET, ::log::Level::Trace, "{}", line);
        $crate::utils::devlog::record(line);
    }};
}
