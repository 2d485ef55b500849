//! Streaming events for model responses.
//!
//! [`StreamEvent`] is what a provider pushes while a streaming response is
//! generated. [`StreamItem`] is the subset a consumer pulls from the
//! aggregated sequence: text deltas, refusal deltas and errors. Provider
//! events of any other kind are visible on the raw handle only.

use serde::{Deserialize, Serialize};

/// A raw event pushed by the provider stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text chunk of the output.
    TextDelta(String),
    /// A chunk of a refusal message.
    RefusalDelta(String),
    /// An error reported by the provider mid-stream.
    Error(String),
    /// Any other provider event, identified by its name.
    Other { kind: String },
}

impl StreamEvent {
    /// Map the event to the item exposed to consumers, if it is one of the
    /// three subscribed kinds.
    pub fn to_item(&self) -> Option<StreamItem> {
        match self {
            StreamEvent::TextDelta(delta) => Some(StreamItem::Text {
                delta: delta.clone(),
            }),
            StreamEvent::RefusalDelta(delta) => Some(StreamItem::Refusal {
                delta: delta.clone(),
            }),
            StreamEvent::Error(message) => Some(StreamItem::Error {
                message: message.clone(),
            }),
            StreamEvent::Other { .. } => None,
        }
    }

    /// Event name as used by the provider protocol.
    pub fn kind(&self) -> &str {
        match self {
            StreamEvent::TextDelta(_) => "response.output_text.delta",
            StreamEvent::RefusalDelta(_) => "response.refusal.delta",
            StreamEvent::Error(_) => "error",
            StreamEvent::Other { kind } => kind,
        }
    }
}

/// One increment of a streaming response, as consumed by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StreamItem {
    Text { delta: String },
    Refusal { delta: String },
    Error { message: String },
}

impl StreamItem {
    /// Returns the delta text for `Text` items.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamItem::Text { delta } => Some(delta),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StreamItem::Error { .. })
    }
}
