// Property suites; failures persist next to the sources under proptest-regressions.
mod prop_eval;
mod prop_parse;
