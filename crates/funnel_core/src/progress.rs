//! Wall-clock-relative progress model for the processing phase.
use std::time::Duration;

/// Percentage of `duration` covered by `elapsed`, clamped to `[0, 100]`.
///
/// Returns exactly `100.0` once `elapsed >= duration`; a zero duration is
/// complete immediately.
pub fn progress_percent(elapsed: Duration, duration: Duration) -> f64 {
    if elapsed >= duration {
        return 100.0;
    }
    (100.0 * elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 100.0)
}

/// Number of script lines revealed at `percent`: `floor(n * percent / 100)`,
/// clamped to `n`.
pub fn revealed_count(percent: f64, script_len: usize) -> usize {
    if script_len == 0 || percent.is_nan() || percent <= 0.0 {
        return 0;
    }
    // Absorb float error so a line due exactly at a boundary is not held back.
    let raw = (script_len as f64 * percent / 100.0 + 1e-9).floor();
    (raw as usize).min(script_len)
}
