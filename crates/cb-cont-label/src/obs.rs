//! Structured diagnostics for label parsing and cache IO.
//!
//! Non-fatal parse conditions (clamped probabilities, `shared` tokens with
//! costs, unparseable floats) are reported here and parsing continues.
//! Each event carries a stable `event` field for log filtering.

use tracing::{trace, warn};

/// Emit event: a probability outside `[0, 1]` was clamped.
pub fn emit_probability_clamped(token: &str, raw: f32, stored: f32) {
    let direction = if raw > 1.0 { "> 1" } else { "< 0" };
    warn!(
        event = "label.probability_clamped",
        token = %token,
        raw = raw,
        stored = stored,
        "invalid probability {direction} specified for an action, resetting to {stored}"
    );
}

/// Emit event: a `shared` token carried a cost and/or probability.
pub fn emit_shared_with_costs(token: &str) {
    warn!(
        event = "label.shared_with_costs",
        token = %token,
        "shared feature vectors should not have costs"
    );
}

/// Emit event: a cost or probability literal was not a number and was replaced by 0.
pub fn emit_float_unparseable(field: &'static str, raw: &str) {
    warn!(
        event = "label.float_unparseable",
        field = field,
        raw = %raw,
        "{raw:?} is not a good float, replacing with 0"
    );
}

/// Emit event: a cache read came up short.
pub fn emit_cache_truncated(needed: usize, got: usize) {
    warn!(
        event = "cache.truncated",
        needed = needed,
        got = got,
        "error in demarshal of cost data"
    );
}

/// Emit event: a label record was written to the cache.
pub fn emit_label_written(entries: usize, bytes: usize) {
    trace!(event = "cache.label_written", entries = entries, bytes = bytes);
}

/// Emit event: a label record was read from the cache.
pub fn emit_label_read(entries: usize, bytes: usize) {
    trace!(event = "cache.label_read", entries = entries, bytes = bytes);
}
