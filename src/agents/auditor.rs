//! Auditor agent - scores the current implementation.
//!
//! Logic diff counts unit test failures, visual diff counts E2E failures and
//! the total diff is their sum. The response is normalised to compact JSON
//! when possible; anything else is passed through untouched and the engine
//! scores it as unparseable.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::call_llm;
use super::prompts::{AUDITOR_SYSTEM_PROMPT, build_auditor_prompt};
use crate::capability::{Capability, CapabilityContext, CapabilityError};
use crate::llm::LlmClient;

pub struct AuditorAgent<L: LlmClient> {
    llm: Arc<L>,
}

impl<L: LlmClient> AuditorAgent<L> {
    pub fn new(llm: Arc<L>) -> Self {
        Self { llm }
    }
}

/// Strip a surrounding Markdown code fence, if any
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Compact JSON if the response holds a JSON document, otherwise the raw text
pub fn normalize_audit_output(response: &str) -> String {
    match serde_json::from_str::<Value>(strip_code_fence(response)) {
        Ok(value) => value.to_string(),
        Err(e) => {
            log::warn!("Auditor response is not valid JSON: {}", e);
            response.to_string()
        }
    }
}

#[async_trait]
impl<L: LlmClient> Capability for AuditorAgent<L> {
    fn name(&self) -> &str {
        "AuditorAgent"
    }

    async fn execute(&self, ctx: &CapabilityContext<'_>) -> Result<String, CapabilityError> {
        let prompt = build_auditor_prompt(ctx.manifest, ctx.current_code, ctx.loop_number);
        let response = call_llm(self.llm.as_ref(), AUDITOR_SYSTEM_PROMPT, prompt).await?;
        Ok(normalize_audit_output(&response))
    }
}
