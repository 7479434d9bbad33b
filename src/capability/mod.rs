//! Capability contract.
//!
//! The engine drives three roles (specifier, coder, auditor) through one
//! trait. Implementations are selected by composition inside the engine.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{LoopResult, Manifest};
use crate::llm::LlmError;

/// Everything a capability sees for one invocation
#[derive(Debug, Clone, Copy)]
pub struct CapabilityContext<'a> {
    pub manifest: &'a Manifest,
    /// Implementation text accumulated so far (empty on the first call)
    pub current_code: &'a str,
    pub loop_number: u32,
    /// Ledger entries of completed iterations
    pub previous_results: &'a [LoopResult],
}

/// A capability invocation failed. The message is surfaced verbatim.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("{0}")]
    Failed(String),

    #[error("Agent execution failed: {0}")]
    Llm(#[from] LlmError),

    #[error("No test failure information available")]
    MissingFeedback,

    /// Failure re-labelled with the agent that raised it
    #[error("{agent} agent failed: {source}")]
    Agent {
        agent: &'static str,
        #[source]
        source: Box<CapabilityError>,
    },
}

impl CapabilityError {
    pub fn failed(message: impl Into<String>) -> Self {
        CapabilityError::Failed(message.into())
    }

    pub fn in_agent(agent: &'static str, source: CapabilityError) -> Self {
        CapabilityError::Agent {
            agent,
            source: Box::new(source),
        }
    }
}

/// One role in the reconciliation loop
#[async_trait]
pub trait Capability: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Run the role once and return its text output
    async fn execute(&self, ctx: &CapabilityContext<'_>) -> Result<String, CapabilityError>;
}
