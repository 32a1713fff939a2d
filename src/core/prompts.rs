//! Prompt construction for estimate requests
//!
//! The whole instruction goes into a single input string. JSON mode requires
//! the word "JSON" to appear in it, which the preamble guarantees.

use crate::core::schema::SCHEMA_TEMPLATE;
use crate::error::{EstimateError, Result};
use crate::models::LimitsConfig;

const PROMPT_PREAMBLE: &str = "You are an AI time estimation assistant.
Return ONLY valid JSON (no markdown, no extra text). The JSON must match this exact shape:";

const PROMPT_RULES: &str = r#"Rules:
- Minutes must be realistic for a single person.
- The minutes of all steps must sum exactly to total_minutes.
- range.min <= total_minutes <= range.max.
- Include 3 to 7 steps, in the order they would be done.
- Include at least 2 assumptions and 2 risks.
- Do not include any keys besides the 5 required keys.
- If the task description is too vague, make reasonable assumptions and list them."#;

/// Build the model instruction for a task description
///
/// Fails with a validation error, before anything touches the network, when
/// the description is blank or longer than `limits.max_task_chars`.
pub fn build_prompt(task: &str, limits: &LimitsConfig) -> Result<String> {
    let task = task.trim();
    if task.is_empty() {
        return Err(EstimateError::Validation(
            "No task description provided. Please enter a brief description of the task.".to_string(),
        ));
    }

    let chars = task.chars().count();
    if chars > limits.max_task_chars {
        return Err(EstimateError::Validation(format!(
            "Task description is {} characters (max: {})",
            chars, limits.max_task_chars
        )));
    }

    Ok(format!(
        "{}\n\n{}\n\n{}\n\nTask description:\n{}",
        PROMPT_PREAMBLE, SCHEMA_TEMPLATE, PROMPT_RULES, task
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorKind;

    #[test]
    fn test_prompt_embeds_schema_and_task() {
        let prompt = build_prompt("Paint the fence", &LimitsConfig::default()).unwrap();
        assert!(prompt.contains(SCHEMA_TEMPLATE));
        assert!(prompt.contains("JSON"));
        assert!(prompt.contains("no markdown"));
        assert!(prompt.ends_with("Task description:\nPaint the fence"));
    }

    #[test]
    fn test_prompt_trims_task() {
        let prompt = build_prompt("  \n Write a report \t", &LimitsConfig::default()).unwrap();
        assert!(prompt.ends_with("\nWrite a report"));
    }

    #[test]
    fn test_empty_task_is_rejected() {
        let error = build_prompt("", &LimitsConfig::default()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_whitespace_task_is_rejected() {
        let error = build_prompt(" \t\n  ", &LimitsConfig::default()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_task_length_limit_counts_chars() {
        let limits = LimitsConfig { max_task_chars: 5 };
        assert!(build_prompt("ééééé", &limits).is_ok());
        let error = build_prompt("ééééééé", &limits).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert!(error.to_string().contains("7 characters (max: 5)"));
    }

    #[test]
    fn test_rules_mention_sum_invariant() {
        assert!(PROMPT_RULES.contains("sum exactly to total_minutes"));
        assert!(PROMPT_RULES.contains("range.min <= total_minutes <= range.max"));
    }
}
