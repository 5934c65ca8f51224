//! JSON schemas for structured chat replies.
//!
//! Uses the `schemars` crate to derive the schema from the Rust type the reply
//! is parsed into.
//!
//! # Example
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use inference_client::StructuredOutput;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Answer {
//!     answer: String,
//!     reasoning: String,
//! }
//!
//! let schema = Answer::response_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Types a chat reply can be constrained to and parsed into.
///
/// Implemented for every `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Strict-mode schema for this type.
    ///
    /// Strict `json_schema` response formats need every object closed
    /// (`additionalProperties: false`), every property listed in `required`
    /// and no `$ref` indirection, so the schemars output is rewritten to match.
    fn response_schema() -> Value {
        let root = serde_json::to_value(schema_for!(Self)).unwrap_or_default();
        let definitions = root.get("definitions").cloned().unwrap_or(Value::Null);

        let mut schema = strict(root, &definitions);
        if let Value::Object(map) = &mut schema {
            map.remove("definitions");
            map.remove("$schema");
        }
        schema
    }

    /// Schema name sent alongside the schema.
    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn strict(value: Value, definitions: &Value) -> Value {
    match value {
        Value::Object(map) => {
            if let Some(target) = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
            {
                return strict(target.clone(), definitions);
            }

            let mut map: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| {
                    // Definitions are inlined at their use sites.
                    if k == "definitions" {
                        (k, v)
                    } else {
                        (k, strict(v, definitions))
                    }
                })
                .collect();
            close_object(&mut map);
            Value::Object(map)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| strict(item, definitions))
                .collect(),
        ),
        other => other,
    }
}

fn close_object(map: &mut Map<String, Value>) {
    if map.get("type").and_then(Value::as_str) != Some("object") {
        return;
    }
    map.insert("additionalProperties".into(), Value::Bool(false));

    let required: Option<Vec<Value>> = map
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.keys().cloned().map(Value::String).collect());
    if let Some(required) = required {
        map.insert("required".into(), Value::Array(required));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct Citation {
        source: String,
        quote: Option<String>,
    }

    #[derive(Deserialize, JsonSchema)]
    struct CitedAnswer {
        answer: String,
        reasoning: Option<String>,
        citations: Vec<Citation>,
    }

    fn required(schema: &Value) -> Vec<&str> {
        schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect()
    }

    #[test]
    fn test_optional_fields_are_required() {
        let schema = CitedAnswer::response_schema();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        let required = required(&schema);
        assert!(required.contains(&"answer"));
        assert!(required.contains(&"reasoning"));
        assert!(required.contains(&"citations"));
    }

    #[test]
    fn test_nested_types_are_inlined() {
        let schema = CitedAnswer::response_schema();
        let text = serde_json::to_string(&schema).unwrap();

        assert!(!text.contains("$ref"));
        assert!(schema.get("definitions").is_none());
        assert!(schema.get("$schema").is_none());

        let item = &schema["properties"]["citations"]["items"];
        assert_eq!(item["type"], "object");
        assert_eq!(item["additionalProperties"], false);
        assert!(required(item).contains(&"quote"));
    }

    #[test]
    fn test_type_name() {
        assert_eq!(CitedAnswer::type_name(), "CitedAnswer");
    }
}
