//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declaration of a tool offered to the model.
///
/// `parameters` is a JSON Schema object describing the arguments. When
/// `strict` is set, arguments not declared under `properties` are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique name of the tool (e.g., "search_databases")
    pub name: String,
    /// Human-readable description shown to the model
    pub description: String,
    /// JSON Schema for the arguments
    pub parameters: Value,
    /// Reject unknown or extra arguments
    #[serde(default)]
    pub strict: bool,
}

impl ToolSpec {
    /// Create a spec with an empty object schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": [],
            }),
            strict: false,
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Names declared under the schema's `properties`.
    pub fn property_names(&self) -> Vec<&str> {
        self.parameters
            .get("properties")
            .and_then(|p| p.as_object())
            .map(|props| props.keys().map(|k| k.as_str()).collect())
            .unwrap_or_default()
    }

    /// Names listed in the schema's `required` array.
    pub fn required_properties(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(|r| r.as_array())
            .map(|req| req.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    /// Render the function definition sent with a planning request.
    pub fn to_api_tool(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "name": self.name,
            "description": self.description,
            "parameters": self.parameters,
            "strict": self.strict,
        })
    }
}

/// A model-requested invocation of a tool.
///
/// Produced by the planning round-trip and consumed exactly once by the
/// executor. `arguments` is kept as the raw text the model emitted; it is
/// parsed only at execution time so malformed JSON can be reported back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned identifier, unique within one planning response
    pub call_id: String,
    /// Name of the tool to call
    pub name: String,
    /// Raw JSON argument text
    pub arguments: String,
    /// Zero-based position in the planning response
    #[serde(default)]
    pub index: usize,
}

impl ToolCall {
    pub fn new(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            arguments: arguments.into(),
            index: 0,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Parse the raw argument text as JSON.
    ///
    /// Empty text is not JSON and fails like any other malformed input.
    pub fn parse_arguments(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.arguments)
    }
}
