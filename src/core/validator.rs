//! Validation of raw model output into an [`Estimate`].
//!
//! Checks run in a fixed order so that each failure maps to exactly one
//! error kind: JSON syntax (parse), keys and types (schema), then arithmetic
//! (consistency).

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

use crate::core::schema::ESTIMATE_KEYS;
use crate::error::{EstimateError, Result};
use crate::models::{Estimate, MinuteRange, Step};

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z]*[ \t]*\n(.*?)\n?```$").expect("fence pattern is valid")
});

/// Shape-checked but not yet verified estimate
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EstimateDraft {
    total_minutes: u32,
    range: MinuteRange,
    steps: Vec<Step>,
    assumptions: Vec<String>,
    risks: Vec<String>,
}

/// Parse and validate raw model text
pub fn validate_response(raw: &str) -> Result<Estimate> {
    let text = strip_code_fence(raw);

    let value: Value =
        serde_json::from_str(text).map_err(|e| EstimateError::Parse(e.to_string()))?;

    let object = value.as_object().ok_or_else(|| {
        EstimateError::Schema(format!(
            "top-level JSON value must be an object, found {}",
            json_type_name(&value)
        ))
    })?;
    check_keys(object)?;

    let draft: EstimateDraft =
        serde_json::from_value(value).map_err(|e| EstimateError::Schema(e.to_string()))?;
    check_content(&draft)?;
    check_consistency(&draft)?;

    debug!(
        "Validated estimate: {} minutes across {} steps",
        draft.total_minutes,
        draft.steps.len()
    );

    Ok(Estimate::from_validated(
        draft.total_minutes,
        draft.range,
        draft.steps,
        draft.assumptions,
        draft.risks,
    ))
}

/// Remove a single markdown fence wrapping the whole response, if any
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match FENCE_RE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => {
            debug!("Stripped markdown fence from model output");
            inner.as_str().trim()
        }
        None => trimmed,
    }
}

fn check_keys(object: &Map<String, Value>) -> Result<()> {
    let missing: Vec<&str> = ESTIMATE_KEYS
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(EstimateError::Schema(format!(
            "missing required key(s): {}",
            missing.join(", ")
        )));
    }

    let mut unexpected: Vec<&str> = object
        .keys()
        .map(String::as_str)
        .filter(|key| !ESTIMATE_KEYS.contains(key))
        .collect();
    if !unexpected.is_empty() {
        unexpected.sort_unstable();
        return Err(EstimateError::Schema(format!(
            "unexpected key(s): {}",
            unexpected.join(", ")
        )));
    }

    Ok(())
}

fn check_content(draft: &EstimateDraft) -> Result<()> {
    if draft.steps.is_empty() {
        return Err(EstimateError::Schema("steps must be a non-empty array".to_string()));
    }

    if let Some(i) = draft.steps.iter().position(|s| s.name.trim().is_empty()) {
        return Err(EstimateError::Schema(format!(
            "steps[{}].name must be a non-empty string",
            i
        )));
    }

    for (field, items) in [("assumptions", &draft.assumptions), ("risks", &draft.risks)] {
        if let Some(i) = items.iter().position(|s| s.trim().is_empty()) {
            return Err(EstimateError::Schema(format!(
                "{}[{}] must be a non-empty string",
                field, i
            )));
        }
    }

    Ok(())
}

fn check_consistency(draft: &EstimateDraft) -> Result<()> {
    let sum: u64 = draft.steps.iter().map(|s| u64::from(s.minutes)).sum();
    if sum != u64::from(draft.total_minutes) {
        return Err(EstimateError::Consistency(format!(
            "sum of step minutes is {} but total_minutes is {}",
            sum, draft.total_minutes
        )));
    }

    let range = draft.range;
    if range.min > range.max {
        return Err(EstimateError::Consistency(format!(
            "range.min ({}) is greater than range.max ({})",
            range.min, range.max
        )));
    }
    if !range.contains(draft.total_minutes) {
        return Err(EstimateError::Consistency(format!(
            "total_minutes ({}) is outside range {} to {}",
            draft.total_minutes, range.min, range.max
        )));
    }

    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
