//! Domain types for VibeOS
//!
//! - Manifest: the desired-state document and its mutable status block
//! - Phase: the reconciliation lifecycle
//! - LoopResult: one ledger entry per iteration
//! - AuditReport: the structured auditor output
//! - CrashLoopConfig / ReconciliationResult: run policy and outcome

pub mod audit;
pub mod loop_result;
pub mod manifest;
pub mod phase;
pub mod reconciliation;

pub use audit::AuditReport;
pub use loop_result::{AgentRole, LoopResult, UNPARSEABLE_DIVERGENCE};
pub use manifest::{FunctionalSpec, Manifest, ManifestMetadata, ManifestSpec, ManifestStatus, TechConstraints, VisualSpec};
pub use phase::Phase;
pub use reconciliation::{
    CRASH_LOOP_DETECTED, CrashLoopConfig, MAX_LOOPS_EXCEEDED, NO_CONVERGENCE, ReconciliationResult,
    is_valid_stagnation_threshold,
};
