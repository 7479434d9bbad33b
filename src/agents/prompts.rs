//! System prompts and user-prompt builders for the three agents.

use crate::domain::Manifest;

pub const SPECIFIER_SYSTEM_PROMPT: &str = "You are a TDD-first Test Generator.
Your role is to generate comprehensive test files BEFORE any implementation code exists.

Rules:
1. Generate tests based on the manifest spec
2. Tests MUST initially FAIL (Red phase)
3. Cover all functional requirements and edge cases
4. Use the testing framework specified in constraints
5. Include unit tests, integration tests, and visual regression tests

Output format: Pure test code in the specified testing framework.";

pub const CODER_SYSTEM_PROMPT: &str = "You are the Coder Agent.
Your role is to write or modify code to make failing tests pass.

Given:
- Failing test results
- Current code (if any)
- The original manifest

Write minimal, clean code that:
1. Makes the tests pass
2. Follows the tech stack constraints
3. Matches the visual and functional spec

Output ONLY the code, no explanations.";

pub const AUDITOR_SYSTEM_PROMPT: &str = "You are a Test Result Auditor.
Your role is to calculate the diff between the current implementation and the desired state.

Rules:
1. Logic Diff: count of unit test failures
2. Visual Diff: count of E2E test failures
3. Total Diff = Logic Diff + Visual Diff
4. Provide recommendations for fixing failing tests
5. Return results as a single JSON object and nothing else

Output format (JSON):
{
  \"totalTests\": number,
  \"passedTests\": number,
  \"failedTests\": number,
  \"logicDiff\": number,
  \"visualDiff\": number,
  \"totalDiff\": number,
  \"recommendations\": string[]
}

A totalDiff of 0 means all tests pass and the system is in the desired state.";

pub const NO_FEEDBACK: &str = "No test failures - generate initial implementation";
pub const NO_CODE: &str = "// No code exists yet";

/// Test-generation prompt listing everything the manifest asks for
pub fn build_specifier_prompt(manifest: &Manifest) -> String {
    let spec = &manifest.spec;
    let mut prompt = String::new();

    prompt.push_str("Generate test files for the following component:\n\n");
    prompt.push_str(&format!("Component: {}\n", manifest.metadata.name));
    prompt.push_str(&format!("Intent: {}\n\n", spec.intent));

    prompt.push_str(&format!("Framework: {}\n", spec.constraints.framework));
    prompt.push_str(&format!("Language: {}\n", spec.constraints.language));
    prompt.push_str(&format!(
        "Testing Frameworks: {}\n\n",
        spec.constraints.testing.join(", ")
    ));

    prompt.push_str("Functional Requirements:\n");
    if let Some(inputs) = &spec.functional_spec.inputs {
        prompt.push_str(&format!("Inputs: {}\n", inputs.join(", ")));
    }
    prompt.push_str(&format!("States: {}\n", spec.functional_spec.states.join(", ")));
    prompt.push_str(&format!(
        "Behaviors: {}\n",
        spec.functional_spec.behaviors.join(", ")
    ));

    if let Some(visual) = &spec.visual_spec {
        if let Some(style) = &visual.style {
            prompt.push_str(&format!("Visual Style: {}\n", style));
        }
        prompt.push_str(&format!("Visual Elements: {}\n", visual.elements.join(", ")));
    }

    prompt
}

pub fn build_coder_prompt(manifest_json: &str, test_results: &str, current_code: &str) -> String {
    format!(
        "Manifest:\n{}\n\nTest Results:\n{}\n\nCurrent Code:\n{}\n\nWrite code to make these tests pass.\n",
        manifest_json, test_results, current_code
    )
}

pub fn build_auditor_prompt(manifest: &Manifest, current_code: &str, loop_number: u32) -> String {
    let spec = &manifest.spec;
    let mut prompt = String::new();

    prompt.push_str("Analyze test results for the following component:\n\n");
    prompt.push_str(&format!("Component: {}\n", manifest.metadata.name));
    prompt.push_str(&format!("Loop Number: {}\n", loop_number));
    prompt.push_str(&format!("Intent: {}\n\n", spec.intent));

    prompt.push_str("Current Implementation:\n```\n");
    prompt.push_str(current_code);
    prompt.push_str("\n```\n\n");

    prompt.push_str("Functional Requirements:\n");
    prompt.push_str(&format!("States: {}\n", spec.functional_spec.states.join(", ")));
    prompt.push_str(&format!(
        "Behaviors: {}\n",
        spec.functional_spec.behaviors.join(", ")
    ));
    if let Some(visual) = &spec.visual_spec {
        prompt.push_str(&format!("Visual Elements: {}\n", visual.elements.join(", ")));
    }

    prompt.push_str("\nCalculate the diff and return your analysis as the JSON object described.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FunctionalSpec, ManifestSpec, TechConstraints, VisualSpec};

    fn manifest(visual: Option<VisualSpec>) -> Manifest {
        Manifest::new(
            "login-form",
            "1.0.0",
            ManifestSpec {
                intent: "A login form".to_string(),
                constraints: TechConstraints {
                    framework: "react".to_string(),
                    language: "typescript".to_string(),
                    testing: vec!["jest".to_string(), "playwright".to_string()],
                },
                visual_spec: visual,
                functional_spec: FunctionalSpec {
                    inputs: Some(vec!["email".to_string()]),
                    states: vec!["idle".to_string(), "error".to_string()],
                    behaviors: vec!["validate email format".to_string()],
                },
            },
        )
    }

    #[test]
    fn test_specifier_prompt_lists_requirements() {
        let prompt = build_specifier_prompt(&manifest(None));
        assert!(prompt.contains("Intent: A login form"));
        assert!(prompt.contains("Framework: react"));
        assert!(prompt.contains("Testing Frameworks: jest, playwright"));
        assert!(prompt.contains("Inputs: email"));
        assert!(prompt.contains("States: idle, error"));
        assert!(prompt.contains("Behaviors: validate email format"));
        assert!(!prompt.contains("Visual Elements"));
    }

    #[test]
    fn test_specifier_prompt_with_visual_spec() {
        let visual = VisualSpec {
            style: Some("minimal".to_string()),
            elements: vec!["submit button".to_string()],
        };
        let prompt = build_specifier_prompt(&manifest(Some(visual)));
        assert!(prompt.contains("Visual Style: minimal"));
        assert!(prompt.contains("Visual Elements: submit button"));
    }

    #[test]
    fn test_coder_prompt_sections() {
        let prompt = build_coder_prompt("{}", "2 tests failed", NO_CODE);
        assert!(prompt.contains("Test Results:\n2 tests failed"));
        assert!(prompt.contains("Current Code:\n// No code exists yet"));
    }

    #[test]
    fn test_auditor_prompt_includes_code_and_loop() {
        let prompt = build_auditor_prompt(&manifest(None), "export const x = 1;", 4);
        assert!(prompt.contains("Loop Number: 4"));
        assert!(prompt.contains("export const x = 1;"));
        assert!(prompt.contains("States: idle, error"));
    }

    #[test]
    fn test_auditor_system_prompt_asks_for_total_diff() {
        assert!(AUDITOR_SYSTEM_PROMPT.contains("totalDiff"));
    }
}
