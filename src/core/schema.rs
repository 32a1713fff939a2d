//! The fixed JSON shape every estimate must have.
//!
//! The same shape is expressed twice: as a readable template embedded in the
//! prompt, and as a JSON Schema document for strict structured output.

use serde_json::{json, Value};

/// Top-level keys of an estimate, in output order
pub const ESTIMATE_KEYS: [&str; 5] = ["total_minutes", "range", "steps", "assumptions", "risks"];

/// Template shown to the model
pub const SCHEMA_TEMPLATE: &str = r#"{
  "total_minutes": <integer>,
  "range": {"min": <integer>, "max": <integer>},
  "steps": [{"name": "<string>", "minutes": <integer>}],
  "assumptions": ["<string>", "..."],
  "risks": ["<string>", "..."]
}"#;

/// Schema name sent with `json_schema` structured output
pub const SCHEMA_NAME: &str = "time_estimate";

/// JSON Schema for an estimate, in the strict subset the Responses API accepts
pub fn estimate_json_schema() -> Value {
    let minutes = json!({ "type": "integer", "minimum": 0 });
    let string_list = json!({ "type": "array", "items": { "type": "string" } });

    json!({
        "type": "object",
        "properties": {
            "total_minutes": minutes,
            "range": {
                "type": "object",
                "properties": { "min": minutes, "max": minutes },
                "required": ["min", "max"],
                "additionalProperties": false
            },
            "steps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "minutes": minutes
                    },
                    "required": ["name", "minutes"],
                    "additionalProperties": false
                }
            },
            "assumptions": string_list,
            "risks": string_list
        },
        "required": ESTIMATE_KEYS,
        "additionalProperties": false
    })
}
