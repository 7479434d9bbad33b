//! Phase state machine.
//!
//! Tracks the current phase and loop count and classifies the next phase from
//! a divergence score. It never fails; legality of transitions is the driver's
//! concern.

use crate::domain::Phase;

#[derive(Debug, Clone)]
pub struct StateMachine {
    current_phase: Phase,
    loop_count: u32,
    max_loops: u32,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new(10)
    }
}

impl StateMachine {
    pub fn new(max_loops: u32) -> Self {
        Self {
            current_phase: Phase::Pending,
            loop_count: 0,
            max_loops,
        }
    }

    pub fn current_phase(&self) -> Phase {
        self.current_phase
    }

    /// Unconditionally overwrite the current phase
    pub fn transition(&mut self, phase: Phase) {
        log::debug!("Phase transition: {} -> {}", self.current_phase, phase);
        self.current_phase = phase;
    }

    /// Classify the next phase.
    ///
    /// Zero divergence wins over the loop ceiling. When `loop_number` is `None`
    /// the internal counter is used.
    pub fn check_transition(&self, divergence: i64, loop_number: Option<u32>) -> Phase {
        let loop_number = loop_number.unwrap_or(self.loop_count);

        if divergence == 0 {
            return Phase::Ready;
        }

        if loop_number >= self.max_loops {
            return Phase::Failed;
        }

        Phase::Reconciling
    }

    pub fn increment_loop(&mut self) {
        self.loop_count = self.loop_count.saturating_add(1);
    }

    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    /// Back to `Pending` with a zeroed counter
    pub fn reset(&mut self) {
        self.current_phase = Phase::Pending;
        self.loop_count = 0;
    }

    pub fn max_loops(&self) -> u32 {
        self.max_loops
    }
}
