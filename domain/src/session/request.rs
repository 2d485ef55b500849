//! Model request shape shared by the planning and streaming calls.
//!
//! Both calls follow the same temperature rule: reasoning models omit the
//! field entirely, every other model is pinned to `0.0`.

use crate::conversation::Conversation;
use crate::core::model::Model;
use crate::tool::ToolSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How the model may use the declared tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
    Required,
    None,
}

/// Structured-output schema bound to a streaming request.
///
/// `name` is the caller-chosen key the provider binds the schema under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
    #[serde(default)]
    pub strict: bool,
}

impl OutputSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
            strict: true,
        }
    }
}

/// A request to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    pub model: Model,
    pub input: Conversation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,
}

impl ModelRequest {
    /// Planning request: declared tools with tool use forced.
    pub fn planning(model: &Model, input: &Conversation, tools: &[ToolSpec]) -> Self {
        Self {
            model: model.clone(),
            input: input.clone(),
            tools: tools.iter().map(ToolSpec::to_api_tool).collect(),
            tool_choice: Some(ToolChoice::Required),
            temperature: model.request_temperature(),
            output_schema: None,
        }
    }

    /// Streaming request without tools.
    pub fn streaming(model: &Model, input: &Conversation) -> Self {
        Self {
            model: model.clone(),
            input: input.clone(),
            tools: Vec::new(),
            tool_choice: None,
            temperature: model.request_temperature(),
            output_schema: None,
        }
    }

    pub fn with_output_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }
}
