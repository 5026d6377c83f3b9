//! Utility modules: developer trace sink, numeric conversions.
pub mod devlog;
pub mod num;
