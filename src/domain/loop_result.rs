//! Per-iteration ledger entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Divergence recorded when the auditor output could not be interpreted
pub const UNPARSEABLE_DIVERGENCE: i64 = -1;

/// The three capability roles invoked each iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Specifier,
    Coder,
    Auditor,
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentRole::Specifier => "specifier",
            AgentRole::Coder => "coder",
            AgentRole::Auditor => "auditor",
        };
        f.write_str(name)
    }
}

/// Immutable record of one reconciliation iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopResult {
    /// 1-based, increases by one per entry
    pub loop_number: u32,

    /// Role that produced the terminal output of the iteration
    pub phase: AgentRole,

    pub success: bool,

    /// 0 = converged, negative = could not be determined
    #[serde(rename = "diff")]
    pub divergence: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub timestamp: DateTime<Utc>,
}

impl LoopResult {
    /// Build the entry for an iteration that concluded on the auditor
    pub fn audited(loop_number: u32, divergence: i64, output: impl Into<String>) -> Self {
        Self {
            loop_number,
            phase: AgentRole::Auditor,
            success: divergence == 0,
            divergence,
            output: Some(output.into()),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn is_converged(&self) -> bool {
        self.divergence == 0
    }

    /// True when the auditor output carried no usable score
    pub fn is_unparseable(&self) -> bool {
        self.divergence == UNPARSEABLE_DIVERGENCE
    }
}
