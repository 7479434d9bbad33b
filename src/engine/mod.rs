//! Reconciliation engine.
//!
//! - StateMachine: classifies the next phase from divergence and loop count
//! - LoopLedger: append-only history of one run
//! - detect_crash_loop: sliding-window stagnation heuristic
//! - ReconciliationEngine: the driver tying them to the three capabilities

mod ledger;
mod reconciler;
mod stagnation;
mod state_machine;

pub use ledger::LoopLedger;
pub use reconciler::{ReconciliationEngine, parse_divergence};
pub use stagnation::detect_crash_loop;
pub use state_machine::StateMachine;
