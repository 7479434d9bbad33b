//! VibeOS - a convergence-driven reconciliation loop
//!
//! Given a declarative manifest, VibeOS repeatedly invokes a specifier, a coder
//! and an auditor until the audited divergence reaches zero, the loop budget is
//! spent, or progress stalls.

pub mod agents;
pub mod capability;
pub mod domain;
pub mod engine;
pub mod error;
pub mod llm;
pub mod storage;

pub use capability::{Capability, CapabilityContext, CapabilityError};
pub use domain::{CrashLoopConfig, LoopResult, Manifest, Phase, ReconciliationResult};
pub use engine::ReconciliationEngine;
pub use error::{Result, VibeError};
