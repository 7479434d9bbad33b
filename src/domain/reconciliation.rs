//! Run-level policy and outcome types.

use serde::{Deserialize, Serialize};

use super::{LoopResult, Phase};

pub const MAX_LOOPS_EXCEEDED: &str = "Max loops exceeded";
pub const CRASH_LOOP_DETECTED: &str = "Crash loop detected: no improvement in recent loops";
pub const NO_CONVERGENCE: &str = "Maximum loops exceeded without convergence";

/// True when `threshold` is a fraction in `0.0..=1.0` (NaN is rejected)
pub fn is_valid_stagnation_threshold(threshold: f64) -> bool {
    (0.0..=1.0).contains(&threshold)
}

/// Policy knobs for one reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashLoopConfig {
    /// Hard iteration ceiling
    pub max_total_loops: u32,
    /// Window size for stagnation evaluation
    pub max_stagnation_count: usize,
    /// Minimum fractional improvement (0-1) between consecutive window entries
    pub stagnation_threshold: f64,
}

impl Default for CrashLoopConfig {
    fn default() -> Self {
        Self {
            max_total_loops: 10,
            max_stagnation_count: 5,
            stagnation_threshold: 0.1,
        }
    }
}

impl CrashLoopConfig {
    pub fn with_max_total_loops(mut self, loops: u32) -> Self {
        self.max_total_loops = loops;
        self
    }

    pub fn with_max_stagnation_count(mut self, count: usize) -> Self {
        self.max_stagnation_count = count;
        self
    }

    /// Callers are expected to pass a value accepted by
    /// `is_valid_stagnation_threshold`
    pub fn with_stagnation_threshold(mut self, threshold: f64) -> Self {
        self.stagnation_threshold = threshold;
        self
    }
}

/// Terminal output of `reconcile`, produced exactly once per call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub success: bool,
    pub final_phase: Phase,
    pub total_loops: u32,
    pub loop_history: Vec<LoopResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReconciliationResult {
    pub fn ready(total_loops: u32, loop_history: Vec<LoopResult>) -> Self {
        Self {
            success: true,
            final_phase: Phase::Ready,
            total_loops,
            loop_history,
            error: None,
        }
    }

    pub fn failed(total_loops: u32, loop_history: Vec<LoopResult>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            final_phase: Phase::Failed,
            total_loops,
            loop_history,
            error: Some(error.into()),
        }
    }

    /// Divergence of the last completed iteration, if any
    pub fn final_divergence(&self) -> Option<i64> {
        self.loop_history.last().map(|r| r.divergence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stagnation_threshold_range() {
        assert!(is_valid_stagnation_threshold(0.0));
        assert!(is_valid_stagnation_threshold(0.1));
        assert!(is_valid_stagnation_threshold(1.0));
        assert!(!is_valid_stagnation_threshold(-0.1));
        assert!(!is_valid_stagnation_threshold(1.5));
        assert!(!is_valid_stagnation_threshold(f64::NAN));
        assert!(!is_valid_stagnation_threshold(f64::INFINITY));
    }

    #[test]
    fn test_crash_loop_config_default() {
        let config = CrashLoopConfig::default();
        assert_eq!(config.max_total_loops, 10);
        assert_eq!(config.max_stagnation_count, 5);
        assert!((config.stagnation_threshold - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_crash_loop_config_builders() {
        let config = CrashLoopConfig::default()
            .with_max_total_loops(3)
            .with_max_stagnation_count(2)
            .with_stagnation_threshold(0.5);
        assert_eq!(config.max_total_loops, 3);
        assert_eq!(config.max_stagnation_count, 2);
        assert!((config.stagnation_threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ready_result() {
        let result = ReconciliationResult::ready(1, vec![LoopResult::audited(1, 0, "{}")]);
        assert!(result.success);
        assert_eq!(result.final_phase, Phase::Ready);
        assert!(result.error.is_none());
        assert_eq!(result.final_divergence(), Some(0));
    }

    #[test]
    fn test_failed_result() {
        let result = ReconciliationResult::failed(0, vec![], NO_CONVERGENCE);
        assert!(!result.success);
        assert_eq!(result.final_phase, Phase::Failed);
        assert_eq!(result.error.as_deref(), Some(NO_CONVERGENCE));
        assert_eq!(result.final_divergence(), None);
    }

    #[test]
    fn test_result_serialization_keys() {
        let result = ReconciliationResult::failed(2, vec![], MAX_LOOPS_EXCEEDED);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["finalPhase"], "Failed");
        assert_eq!(json["totalLoops"], 2);
        assert!(json["loopHistory"].as_array().unwrap().is_empty());
        assert_eq!(json["error"], "Max loops exceeded");
    }
}
