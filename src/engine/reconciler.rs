//! Reconciliation engine - the top-level convergence driver.
//!
//! Each iteration invokes the specifier, coder and auditor strictly in that
//! order, appends one ledger entry and then decides whether to stop: zero
//! divergence is success, the loop ceiling and stagnation are failures, and
//! any capability error ends the run immediately.

use std::sync::Arc;

use log::{debug, info, warn};

use super::ledger::LoopLedger;
use super::stagnation::detect_crash_loop;
use super::state_machine::StateMachine;
use crate::agents::{AuditorAgent, CoderAgent, SpecifierAgent};
use crate::capability::{Capability, CapabilityContext, CapabilityError};
use crate::domain::{
    AuditReport, CRASH_LOOP_DETECTED, CrashLoopConfig, LoopResult, MAX_LOOPS_EXCEEDED, Manifest, NO_CONVERGENCE,
    Phase, ReconciliationResult, UNPARSEABLE_DIVERGENCE,
};
use crate::llm::LlmClient;

/// Drives one manifest to convergence.
///
/// Run state (state machine, ledger) is created per `reconcile` call, so one
/// engine may serve several manifests.
pub struct ReconciliationEngine<S, C, A>
where
    S: Capability,
    C: Capability,
    A: Capability,
{
    specifier: Arc<S>,
    coder: Arc<C>,
    auditor: Arc<A>,
    config: CrashLoopConfig,
}

impl<L: LlmClient> ReconciliationEngine<SpecifierAgent<L>, CoderAgent<L>, AuditorAgent<L>> {
    /// Wire the three LLM-backed agents over one shared client
    pub fn with_llm(llm: Arc<L>, config: CrashLoopConfig) -> Self {
        Self::new(
            Arc::new(SpecifierAgent::new(llm.clone())),
            Arc::new(CoderAgent::new(llm.clone())),
            Arc::new(AuditorAgent::new(llm)),
            config,
        )
    }
}

impl<S, C, A> ReconciliationEngine<S, C, A>
where
    S: Capability,
    C: Capability,
    A: Capability,
{
    pub fn new(specifier: Arc<S>, coder: Arc<C>, auditor: Arc<A>, config: CrashLoopConfig) -> Self {
        Self {
            specifier,
            coder,
            auditor,
            config,
        }
    }

    pub fn config(&self) -> &CrashLoopConfig {
        &self.config
    }

    /// Run the reconciliation loop until convergence, budget exhaustion,
    /// stagnation or a capability failure.
    ///
    /// The manifest status is rewritten in place and always ends in a
    /// terminal phase.
    pub async fn reconcile(&self, manifest: &mut Manifest) -> ReconciliationResult {
        let mut state = StateMachine::new(self.config.max_total_loops);
        let mut ledger = LoopLedger::new();
        let mut current_loop = 0;

        state.transition(Phase::Reconciling);
        manifest.status.phase = Phase::Reconciling;
        manifest.status.current_loop = 0;
        manifest.status.last_error = None;

        info!(
            "Reconciling {} v{} (max {} loops, stagnation window {}, threshold {})",
            manifest.metadata.name,
            manifest.metadata.version,
            self.config.max_total_loops,
            self.config.max_stagnation_count,
            self.config.stagnation_threshold
        );

        while current_loop < self.config.max_total_loops {
            current_loop += 1;
            state.increment_loop();
            manifest.status.current_loop = current_loop;

            let loop_result = match self.execute_loop(manifest, current_loop, ledger.entries()).await {
                Ok(result) => result,
                Err(e) => {
                    let message = e.to_string();
                    warn!("Loop {} failed: {}", current_loop, message);
                    state.transition(Phase::Failed);
                    manifest.status.phase = Phase::Failed;
                    manifest.status.last_error = Some(message.clone());
                    return ReconciliationResult::failed(current_loop, ledger.into_vec(), message);
                }
            };

            let divergence = loop_result.divergence;
            ledger.append(loop_result);
            manifest.status.divergence = Some(divergence);
            info!("Loop {} divergence: {}", current_loop, divergence);

            match state.check_transition(divergence, Some(current_loop)) {
                Phase::Ready => {
                    info!("{} converged after {} loops", manifest.metadata.name, current_loop);
                    state.transition(Phase::Ready);
                    manifest.status.phase = Phase::Ready;
                    manifest.status.divergence = Some(0);
                    return ReconciliationResult::ready(current_loop, ledger.into_vec());
                }
                Phase::Failed => {
                    warn!("{} hit the loop ceiling of {}", manifest.metadata.name, state.max_loops());
                    state.transition(Phase::Failed);
                    manifest.status.phase = Phase::Failed;
                    return ReconciliationResult::failed(current_loop, ledger.into_vec(), MAX_LOOPS_EXCEEDED);
                }
                Phase::Pending | Phase::Reconciling => {}
            }

            if self.detect_crash_loop(ledger.entries()) {
                warn!(
                    "{} stagnated: no improvement over the last {} loops",
                    manifest.metadata.name, self.config.max_stagnation_count
                );
                state.transition(Phase::Failed);
                manifest.status.phase = Phase::Failed;
                return ReconciliationResult::failed(current_loop, ledger.into_vec(), CRASH_LOOP_DETECTED);
            }
        }

        state.transition(Phase::Failed);
        manifest.status.phase = Phase::Failed;
        ReconciliationResult::failed(current_loop, ledger.into_vec(), NO_CONVERGENCE)
    }

    /// Stagnation check over the ledger with this engine's policy
    pub fn detect_crash_loop(&self, history: &[LoopResult]) -> bool {
        detect_crash_loop(history, &self.config)
    }

    /// One iteration: specifier, coder, auditor, then score the audit.
    async fn execute_loop(
        &self,
        manifest: &Manifest,
        loop_number: u32,
        history: &[LoopResult],
    ) -> Result<LoopResult, CapabilityError> {
        // The specifier output is observed but not threaded into the coder
        let ctx = CapabilityContext {
            manifest,
            current_code: "",
            loop_number,
            previous_results: history,
        };
        debug!("Loop {}: invoking {}", loop_number, self.specifier.name());
        let tests = self.specifier.execute(&ctx).await?;
        debug!("Loop {}: {} produced {} bytes", loop_number, self.specifier.name(), tests.len());

        debug!("Loop {}: invoking {}", loop_number, self.coder.name());
        let current_code = self.coder.execute(&ctx).await?;

        let auditor_ctx = CapabilityContext {
            manifest,
            current_code: &current_code,
            loop_number,
            previous_results: history,
        };
        debug!("Loop {}: invoking {}", loop_number, self.auditor.name());
        let audit_output = self.auditor.execute(&auditor_ctx).await?;

        let divergence = parse_divergence(&audit_output);
        Ok(LoopResult::audited(loop_number, divergence, audit_output))
    }
}

/// Whole-number `totalDiff` of the audit output, or the unparseable sentinel
pub fn parse_divergence(audit_output: &str) -> i64 {
    match AuditReport::parse(audit_output) {
        Some(report) => report.total_diff,
        None => {
            warn!("Could not parse auditor output; scoring as unparseable");
            UNPARSEABLE_DIVERGENCE
        }
    }
}
