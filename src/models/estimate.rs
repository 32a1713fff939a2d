use serde::{Deserialize, Serialize};

use crate::models::ErrorKind;

/// One named step of the breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    pub name: String,
    pub minutes: u32,
}

impl Step {
    #[cfg(test)]
    pub(crate) fn new(name: impl Into<String>, minutes: u32) -> Self {
        Self { name: name.into(), minutes }
    }
}

/// Inclusive range of plausible total durations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinuteRange {
    pub min: u32,
    pub max: u32,
}

impl MinuteRange {
    pub fn contains(&self, minutes: u32) -> bool {
        self.min <= minutes && minutes <= self.max
    }
}

/// A validated time estimate
///
/// Only the response validator constructs this type, so holding an
/// `Estimate` means every structural and arithmetic check has passed:
/// step minutes sum to `total_minutes` and the range brackets the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Estimate {
    total_minutes: u32,
    range: MinuteRange,
    steps: Vec<Step>,
    assumptions: Vec<String>,
    risks: Vec<String>,
}

impl Estimate {
    pub(crate) fn from_validated(
        total_minutes: u32,
        range: MinuteRange,
        steps: Vec<Step>,
        assumptions: Vec<String>,
        risks: Vec<String>,
    ) -> Self {
        Self {
            total_minutes,
            range,
            steps,
            assumptions,
            risks,
        }
    }

    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    pub fn range(&self) -> MinuteRange {
        self.range
    }

    /// The breakdown, in the order the model listed it
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn assumptions(&self) -> &[String] {
        &self.assumptions
    }

    pub fn risks(&self) -> &[String] {
        &self.risks
    }
}

/// Fallback JSON printed whenever any stage fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error: kind.name().to_string(),
            message: message.into(),
        }
    }

    /// Last-resort rendering that cannot fail
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| {
            format!(
                "{{\n  \"error\": {:?},\n  \"message\": \"failed to serialize error message\"\n}}",
                self.error
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Estimate {
        Estimate::from_validated(
            45,
            MinuteRange { min: 30, max: 60 },
            vec![Step::new("Draft", 30), Step::new("Review", 15)],
            vec!["Single author".to_string()],
            vec!["Scope creep".to_string()],
        )
    }

    #[test]
    fn test_estimate_serializes_in_schema_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        let total = json.find("\"total_minutes\"").unwrap();
        let range = json.find("\"range\"").unwrap();
        let steps = json.find("\"steps\"").unwrap();
        let assumptions = json.find("\"assumptions\"").unwrap();
        let risks = json.find("\"risks\"").unwrap();
        assert!(total < range && range < steps && steps < assumptions && assumptions < risks);
        assert!(json.contains("{\"name\":\"Draft\",\"minutes\":30}"));
        assert!(json.contains("\"range\":{\"min\":30,\"max\":60}"));
    }

    #[test]
    fn test_estimate_accessors() {
        let estimate = sample();
        assert_eq!(estimate.total_minutes(), 45);
        assert_eq!(estimate.range(), MinuteRange { min: 30, max: 60 });
        assert_eq!(estimate.steps().len(), 2);
        assert_eq!(estimate.steps()[1].name, "Review");
        assert_eq!(estimate.assumptions(), ["Single author".to_string()]);
        assert_eq!(estimate.risks(), ["Scope creep".to_string()]);
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = MinuteRange { min: 30, max: 60 };
        assert!(range.contains(30));
        assert!(range.contains(60));
        assert!(!range.contains(29));
        assert!(!range.contains(61));
    }

    #[test]
    fn test_step_rejects_unknown_fields() {
        let result: Result<Step, _> = serde_json::from_str(r#"{"name":"a","minutes":1,"extra":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse::new(ErrorKind::Parse, "bad json");
        let value: serde_json::Value = serde_json::from_str(&response.to_pretty_json()).unwrap();
        assert_eq!(value["error"], "ParseError");
        assert_eq!(value["message"], "bad json");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_error_response_keeps_non_ascii() {
        let response = ErrorResponse::new(ErrorKind::Validation, "tâche vide");
        assert!(response.to_pretty_json().contains("tâche vide"));
    }
}
