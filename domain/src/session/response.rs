//! Planning response types.
//!
//! A planning call returns an ordered list of output items. The tool chain
//! only cares about `function_call` items; text items are kept so callers
//! can log what the model said alongside its calls.
//!
//! # Examples
//!
//! ```
//! use enzymeml_domain::session::response::{PlanningResponse, ResponseItem};
//!
//! let response = PlanningResponse::new(vec![
//!     ResponseItem::message("Looking up the enzyme."),
//!     ResponseItem::function_call("call_1", "search_databases", r#"{"database":"uniprot","ids":["P00722"]}"#),
//! ]);
//! assert!(response.has_tool_calls());
//! assert_eq!(response.tool_calls()[0].index, 0);
//! ```

use crate::tool::ToolCall;
use serde::{Deserialize, Serialize};

/// A single output item of a planning response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseItem {
    /// Assistant text.
    Message { text: String },
    /// A function call request. `arguments` is the raw JSON text.
    FunctionCall {
        call_id: String,
        name: String,
        arguments: String,
    },
}

impl ResponseItem {
    pub fn message(text: impl Into<String>) -> Self {
        ResponseItem::Message { text: text.into() }
    }

    pub fn function_call(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        ResponseItem::FunctionCall {
            call_id: call_id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Returns the text content if this is a `Message` item.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseItem::Message { text } => Some(text),
            _ => None,
        }
    }
}

/// Response of a blocking planning call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningResponse {
    pub items: Vec<ResponseItem>,
    /// Model identifier (if returned by the provider).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl PlanningResponse {
    pub fn new(items: Vec<ResponseItem>) -> Self {
        Self { items, model: None }
    }

    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![ResponseItem::message(text)])
    }

    /// Concatenate all `Message` items into a single string.
    pub fn text_content(&self) -> String {
        self.items
            .iter()
            .filter_map(|item| item.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract every function call in emission order, indexed from zero.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.items
            .iter()
            .filter_map(|item| match item {
                ResponseItem::FunctionCall {
                    call_id,
                    name,
                    arguments,
                } => Some((call_id, name, arguments)),
                _ => None,
            })
            .enumerate()
            .map(|(index, (call_id, name, arguments))| {
                ToolCall::new(call_id, name, arguments).with_index(index)
            })
            .collect()
    }

    /// Returns `true` if the response contains any function call.
    pub fn has_tool_calls(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, ResponseItem::FunctionCall { .. }))
    }
}
