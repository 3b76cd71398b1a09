//! Structured response shapes.
//!
//! Each shape pairs a deserializable Rust struct with the JSON schema
//! descriptor sent to the provider. The `reasoning` field exists solely to
//! let the model plan; it is never surfaced in output artifacts.

use serde::Deserialize;
use serde_json::{Value, json};

/// Response shape for code generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedCode {
    pub reasoning: String,
    pub generated_code: String,
}

impl GeneratedCode {
    /// Schema descriptor in the provider's OpenAPI-subset format.
    pub fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "reasoning": {
                    "type": "STRING",
                    "description": "Use this field to plan out your solution."
                },
                "generated_code": {
                    "type": "STRING",
                    "description": "The generated source code implementation. MUST ONLY INCLUDE THE CODE ITSELF AND NOTHING ELSE."
                }
            },
            "required": ["reasoning", "generated_code"],
            "propertyOrdering": ["reasoning", "generated_code"]
        })
    }
}

/// Response shape for usage-description generation.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageDescription {
    pub reasoning: String,
    pub usage_description: String,
}

impl UsageDescription {
    pub fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "reasoning": {
                    "type": "STRING",
                    "description": "Use this field to plan out your solution."
                },
                "usage_description": {
                    "type": "STRING",
                    "description": "The generated usage description for the provided code."
                }
            },
            "required": ["reasoning", "usage_description"],
            "propertyOrdering": ["reasoning", "usage_description"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_code_schema_requires_both_fields() {
        let schema = GeneratedCode::response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, vec!["reasoning", "generated_code"]);
    }

    #[test]
    fn payload_deserializes() {
        let payload = json!({
            "reasoning": "plan first",
            "generated_code": "x = 1\n"
        });
        let parsed: GeneratedCode = serde_json::from_value(payload).unwrap();
        assert_eq!(parsed.generated_code, "x = 1\n");
    }

    #[test]
    fn payload_missing_field_is_rejected() {
        let payload = json!({ "generated_code": "x = 1\n" });
        assert!(serde_json::from_value::<GeneratedCode>(payload).is_err());
    }
}
