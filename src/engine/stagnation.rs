//! Crash-loop detection.
//!
//! A run is stagnating when no consecutive pair inside the trailing window of
//! `max_stagnation_count` entries improves divergence by at least
//! `stagnation_threshold` (as a fraction of the earlier value).

use crate::domain::{CrashLoopConfig, LoopResult};

/// Returns true when the ledger shows no sufficient progress.
///
/// Fewer entries than the window size is never a crash loop. Pairs whose
/// earlier divergence is zero are skipped. Negative divergences take part in
/// the arithmetic unchanged.
pub fn detect_crash_loop(history: &[LoopResult], config: &CrashLoopConfig) -> bool {
    let window_size = config.max_stagnation_count;
    if history.len() < window_size {
        return false;
    }

    let recent = &history[history.len() - window_size..];

    let has_improvement = recent.windows(2).any(|pair| {
        let previous = pair[0].divergence;
        let current = pair[1].divergence;
        if previous == 0 {
            return false;
        }
        let improvement = previous.saturating_sub(current) as f64 / previous as f64;
        improvement >= config.stagnation_threshold
    });

    !has_improvement
}
