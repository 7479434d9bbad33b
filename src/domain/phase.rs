//! Reconciliation lifecycle phase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// No loop has run yet
    #[default]
    Pending,
    /// Loops are in progress
    Reconciling,
    /// Divergence reached zero
    Ready,
    /// Budget exhausted, stagnation detected, or a capability failed
    Failed,
}

impl Phase {
    /// Returns true for the absorbing phases
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Ready | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Pending => "Pending",
            Phase::Reconciling => "Reconciling",
            Phase::Ready => "Ready",
            Phase::Failed => "Failed",
        };
        f.write_str(name)
    }
}
