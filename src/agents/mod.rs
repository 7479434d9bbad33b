//! LLM-backed implementations of the three capability roles.
//!
//! - SpecifierAgent: writes failing tests from the manifest
//! - CoderAgent: writes code against the latest audit feedback
//! - AuditorAgent: scores the implementation as a JSON report

pub mod auditor;
pub mod coder;
pub mod prompts;
pub mod specifier;

pub use auditor::AuditorAgent;
pub use coder::CoderAgent;
pub use specifier::SpecifierAgent;

use crate::capability::CapabilityError;
use crate::llm::{CompletionRequest, LlmClient};

/// One fresh-context completion with the agent's system prompt
async fn call_llm<L: LlmClient + ?Sized>(
    llm: &L,
    system_prompt: &str,
    user_prompt: String,
) -> Result<String, CapabilityError> {
    let request = CompletionRequest::new(system_prompt).with_user_message(user_prompt);
    let response = llm.complete(request).await?;
    Ok(response.content)
}
