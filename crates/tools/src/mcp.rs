//! Tool interface
//!
//! A standardized tool contract: name, description, a JSON-Schema shaped
//! parameter declaration, and an async execute body. Validation against
//! the declared schema is shared by all tools through the default
//! `validate` implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolError {
    pub code: ErrorCode,
    /// Human-readable message, rendered back to the model runtime
    pub message: String,
}

impl ToolError {
    /// Create an invalid parameters error
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidParams,
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Internal,
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::NotFound,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Tool error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Invalid method parameter(s)
    InvalidParams,
    /// The named tool does not exist
    NotFound,
    /// Execution failed
    Internal,
}

/// Tool output
///
/// Tools in this system produce text for the model runtime to speak, so
/// the output is a single text body plus an error marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub text: String,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// Serialize a value as pretty JSON output
    pub fn json(value: impl Serialize) -> Self {
        Self {
            text: serde_json::to_string_pretty(&value).unwrap_or_default(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: message.into(),
            is_error: true,
        }
    }
}

/// Tool schema (JSON Schema format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

/// Input schema for tool parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertySchema>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl InputSchema {
    /// Create an empty object schema
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: HashMap::new(),
            required: Vec::new(),
        }
    }

    /// Add a property to the schema
    pub fn property(mut self, name: &str, schema: PropertySchema, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }
}

/// Property schema for input parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub prop_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl PropertySchema {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            prop_type: "string".to_string(),
            description: Some(description.into()),
            enum_values: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self {
            prop_type: "number".to_string(),
            description: Some(description.into()),
            enum_values: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self {
            prop_type: "integer".to_string(),
            description: Some(description.into()),
            enum_values: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn enum_type(description: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            prop_type: "string".to_string(),
            description: Some(description.into()),
            enum_values: Some(values),
            minimum: None,
            maximum: None,
        }
    }

    /// Add a minimum value constraint
    pub fn with_minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    /// Add an inclusive numeric range constraint
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.minimum = Some(min);
        self.maximum = Some(max);
        self
    }
}

/// Tool trait
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (used for invocation)
    fn name(&self) -> &str;

    /// Tool description (shown to the model runtime)
    fn description(&self) -> &str;

    /// Input schema
    fn schema(&self) -> ToolSchema;

    /// Execute the tool.
    ///
    /// Implementations await the session readiness gate before any
    /// externally visible effect.
    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError>;

    /// Validate input against the declared schema: required fields, types,
    /// enum membership, and numeric ranges.
    fn validate(&self, input: &Value) -> Result<(), ToolError> {
        let schema = self.schema();

        if let Value::Object(obj) = input {
            for required in &schema.input_schema.required {
                if !obj.contains_key(required) {
                    return Err(ToolError::invalid_params(format!(
                        "Missing required field: {}",
                        required
                    )));
                }
            }

            for (name, value) in obj {
                if let Some(prop_schema) = schema.input_schema.properties.get(name) {
                    validate_property(name, value, prop_schema)?;
                }
                // Unknown properties pass through.
            }

            Ok(())
        } else if schema.input_schema.properties.is_empty() {
            Ok(())
        } else {
            Err(ToolError::invalid_params("Input must be an object"))
        }
    }
}

/// Validate a property value against its schema
pub fn validate_property(name: &str, value: &Value, schema: &PropertySchema) -> Result<(), ToolError> {
    let type_valid = match schema.prop_type.as_str() {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        _ => true,
    };

    if !type_valid {
        return Err(ToolError::invalid_params(format!(
            "Field '{}' must be of type '{}', got '{}'",
            name,
            schema.prop_type,
            json_type_name(value)
        )));
    }

    if let Some(enum_values) = &schema.enum_values {
        if let Some(s) = value.as_str() {
            if !enum_values.iter().any(|v| v == s) {
                return Err(ToolError::invalid_params(format!(
                    "Field '{}' must be one of: [{}], got '{}'",
                    name,
                    enum_values.join(", "),
                    s
                )));
            }
        }
    }

    if let Some(num) = value.as_f64() {
        if !num.is_finite() {
            return Err(ToolError::invalid_params(format!(
                "Field '{}' must be a finite number",
                name
            )));
        }
        if let Some(min) = schema.minimum {
            if num < min {
                return Err(ToolError::invalid_params(format!(
                    "Field '{}' must be >= {}, got {}",
                    name, min, num
                )));
            }
        }
        if let Some(max) = schema.maximum {
            if num > max {
                return Err(ToolError::invalid_params(format!(
                    "Field '{}' must be <= {}, got {}",
                    name, max, num
                )));
            }
        }
    }

    Ok(())
}

/// Get a human-readable type name for a JSON value
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_schema_builder() {
        let schema = InputSchema::object()
            .property("name", PropertySchema::string("Customer name"), true)
            .property("budget", PropertySchema::number("Budget"), true)
            .property("phone", PropertySchema::string("Phone"), false);

        assert_eq!(schema.properties.len(), 3);
        assert_eq!(schema.required, vec!["name", "budget"]);
    }

    #[test]
    fn test_tool_output_constructors() {
        let ok = ToolOutput::text("done");
        assert!(!ok.is_error);
        let err = ToolOutput::error("failed");
        assert!(err.is_error);
    }

    #[test]
    fn test_validate_property_type() {
        let schema = PropertySchema::string("test");
        assert!(validate_property("f", &json!("ok"), &schema).is_ok());
        assert!(validate_property("f", &json!(7), &schema).is_err());
    }

    #[test]
    fn test_validate_property_enum() {
        let schema = PropertySchema::enum_type("test", vec!["SUV".into(), "Sedan".into()]);
        assert!(validate_property("f", &json!("SUV"), &schema).is_ok());
        assert!(validate_property("f", &json!("Boat"), &schema).is_err());
    }

    #[test]
    fn test_validate_property_range() {
        let schema = PropertySchema::integer("rating").with_range(1.0, 5.0);
        assert!(validate_property("f", &json!(3), &schema).is_ok());
        assert!(validate_property("f", &json!(0), &schema).is_err());
        assert!(validate_property("f", &json!(6), &schema).is_err());
    }

    #[test]
    fn test_validate_property_minimum_only() {
        let schema = PropertySchema::number("budget").with_minimum(0.0);
        assert!(validate_property("f", &json!(0.0), &schema).is_ok());
        assert!(validate_property("f", &json!(-100.0), &schema).is_err());
    }
}
