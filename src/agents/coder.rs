//! Coder agent - generates implementation code from audit feedback.

use std::sync::Arc;

use async_trait::async_trait;

use super::call_llm;
use super::prompts::{CODER_SYSTEM_PROMPT, NO_CODE, NO_FEEDBACK, build_coder_prompt};
use crate::capability::{Capability, CapabilityContext, CapabilityError};
use crate::domain::{AgentRole, LoopResult};
use crate::llm::LlmClient;

pub struct CoderAgent<L: LlmClient> {
    llm: Arc<L>,
}

impl<L: LlmClient> CoderAgent<L> {
    pub fn new(llm: Arc<L>) -> Self {
        Self { llm }
    }

    async fn generate(&self, ctx: &CapabilityContext<'_>) -> Result<String, CapabilityError> {
        let feedback = extract_test_failure(ctx.previous_results);
        if feedback.is_none() && !ctx.previous_results.is_empty() {
            return Err(CapabilityError::MissingFeedback);
        }

        let manifest_json = serde_json::to_string_pretty(ctx.manifest)
            .map_err(|e| CapabilityError::failed(format!("Failed to serialize manifest: {}", e)))?;

        let current_code = if ctx.current_code.is_empty() {
            NO_CODE
        } else {
            ctx.current_code
        };

        let prompt = build_coder_prompt(&manifest_json, feedback.unwrap_or(NO_FEEDBACK), current_code);
        call_llm(self.llm.as_ref(), CODER_SYSTEM_PROMPT, prompt).await
    }
}

/// Feedback for the next attempt: the latest auditor output, else the last
/// recorded error.
pub fn extract_test_failure(previous_results: &[LoopResult]) -> Option<&str> {
    let audited = previous_results
        .iter()
        .rev()
        .find(|r| r.phase == AgentRole::Auditor)
        .and_then(|r| r.output.as_deref())
        .filter(|o| !o.is_empty());

    audited.or_else(|| previous_results.last().and_then(|r| r.error.as_deref()))
}

#[async_trait]
impl<L: LlmClient> Capability for CoderAgent<L> {
    fn name(&self) -> &str {
        "CoderAgent"
    }

    async fn execute(&self, ctx: &CapabilityContext<'_>) -> Result<String, CapabilityError> {
        self.generate(ctx)
            .await
            .map_err(|e| CapabilityError::in_agent("Coder", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FunctionalSpec, Manifest, ManifestSpec, TechConstraints};
    use crate::llm::MockLlmClient;

    fn manifest() -> Manifest {
        Manifest::new(
            "counter",
            "0.1.0",
            ManifestSpec {
                intent: "A click counter".to_string(),
                constraints: TechConstraints::default(),
                visual_spec: None,
                functional_spec: FunctionalSpec {
                    inputs: None,
                    states: vec!["zero".to_string()],
                    behaviors: vec![],
                },
            },
        )
    }

    #[test]
    fn test_extract_prefers_latest_auditor_output() {
        let history = vec![
            LoopResult::audited(1, 3, "first audit"),
            LoopResult::audited(2, 2, "second audit"),
        ];
        assert_eq!(extract_test_failure(&history), Some("second audit"));
    }

    #[test]
    fn test_extract_falls_back_to_error() {
        let mut entry = LoopResult::audited(1, 3, "");
        entry.error = Some("tests crashed".to_string());
        assert_eq!(extract_test_failure(&[entry]), Some("tests crashed"));
    }

    #[test]
    fn test_extract_empty_history() {
        assert_eq!(extract_test_failure(&[]), None);
    }

    #[tokio::test]
    async fn test_initial_implementation_prompt() {
        let llm = Arc::new(MockLlmClient::new(vec!["export const count = 0;".to_string()]));
        let agent = CoderAgent::new(llm.clone());
        let manifest = manifest();
        let ctx = CapabilityContext {
            manifest: &manifest,
            current_code: "",
            loop_number: 1,
            previous_results: &[],
        };

        let code = agent.execute(&ctx).await.unwrap();
        assert_eq!(code, "export const count = 0;");

        let prompt = &llm.requests()[0].messages[0].content;
        assert!(prompt.contains(NO_FEEDBACK));
        assert!(prompt.contains(NO_CODE));
        assert!(prompt.contains("\"name\": \"counter\""));
    }

    #[tokio::test]
    async fn test_feedback_from_previous_audit() {
        let llm = Arc::new(MockLlmClient::new(vec!["fixed".to_string()]));
        let agent = CoderAgent::new(llm.clone());
        let manifest = manifest();
        let history = vec![LoopResult::audited(1, 2, r#"{"totalDiff":2,"recommendations":["fix click"]}"#)];
        let ctx = CapabilityContext {
            manifest: &manifest,
            current_code: "let count = 0;",
            loop_number: 2,
            previous_results: &history,
        };

        agent.execute(&ctx).await.unwrap();

        let prompt = &llm.requests()[0].messages[0].content;
        assert!(prompt.contains("fix click"));
        assert!(prompt.contains("let count = 0;"));
    }

    #[tokio::test]
    async fn test_missing_feedback_is_an_error() {
        let llm = Arc::new(MockLlmClient::new(vec!["unused".to_string()]));
        let agent = CoderAgent::new(llm.clone());
        let manifest = manifest();
        let history = vec![LoopResult::audited(1, 2, "")];
        let ctx = CapabilityContext {
            manifest: &manifest,
            current_code: "",
            loop_number: 2,
            previous_results: &history,
        };

        let err = agent.execute(&ctx).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Coder agent failed: No test failure information available"
        );
        match err {
            CapabilityError::Agent { agent, source } => {
                assert_eq!(agent, "Coder");
                assert!(matches!(*source, CapabilityError::MissingFeedback));
            }
            other => panic!("Expected agent-labelled error, got {:?}", other),
        }
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_llm_failure_is_labelled_with_coder() {
        let llm = Arc::new(MockLlmClient::default());
        llm.push_error("overloaded");
        let agent = CoderAgent::new(llm);
        let manifest = manifest();
        let ctx = CapabilityContext {
            manifest: &manifest,
            current_code: "",
            loop_number: 1,
            previous_results: &[],
        };

        let err = agent.execute(&ctx).await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Coder agent failed: Agent execution failed"));
        assert!(message.contains("overloaded"));
    }
}
