//! Specifier agent - generates tests before any code exists.

use std::sync::Arc;

use async_trait::async_trait;

use super::call_llm;
use super::prompts::{SPECIFIER_SYSTEM_PROMPT, build_specifier_prompt};
use crate::capability::{Capability, CapabilityContext, CapabilityError};
use crate::llm::LlmClient;

pub struct SpecifierAgent<L: LlmClient> {
    llm: Arc<L>,
}

impl<L: LlmClient> SpecifierAgent<L> {
    pub fn new(llm: Arc<L>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl<L: LlmClient> Capability for SpecifierAgent<L> {
    fn name(&self) -> &str {
        "SpecifierAgent"
    }

    async fn execute(&self, ctx: &CapabilityContext<'_>) -> Result<String, CapabilityError> {
        let prompt = build_specifier_prompt(ctx.manifest);
        call_llm(self.llm.as_ref(), SPECIFIER_SYSTEM_PROMPT, prompt).await
    }
}
