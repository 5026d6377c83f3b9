//! Numeric utilities: centralized conversions between pagination counters (`u64`) and
//! slice positions (`usize`).
//!
//! Guidelines
//! - Prefer saturating conversions for offsets and limits: an offset past the end of the
//!   data must clip to the end rather than wrap or panic.
//! - Prefer lossless widening with explicit helpers to keep call sites searchable.

#[inline]
#[must_use]
pub fn u64_to_usize_saturating(v: u64) -> usize {
    usize::try_from(v).unwrap_or(usize::MAX)
}

#[inline]
#[must_use]
pub fn usize_to_u64(v: usize) -> u64 {
    u64::try_from(v).unwrap_or(u64::MAX)
}

/// `offset + limit` as a target item count; `None` when the limit is unbounded (zero).
#[inline]
#[must_use]
pub fn window_end(offset: u64, limit: u64) -> Option<usize> {
    if limit == 0 {
        return None;
    }
    Some(u64_to_usize_saturating(offset.saturating_add(limit)))
}
