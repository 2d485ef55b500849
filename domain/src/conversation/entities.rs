//! Conversation domain entities

use crate::tool::{ToolCall, ToolResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A role-tagged message (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One entry of a [`Conversation`].
///
/// Serialized with a `type` tag matching the provider protocol
/// (`message`, `function_call`, `function_call_output`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationItem {
    Message(Message),
    FunctionCall {
        call_id: String,
        name: String,
        arguments: String,
    },
    FunctionCallOutput {
        call_id: String,
        output: String,
    },
}

impl ConversationItem {
    pub fn function_call(call: &ToolCall) -> Self {
        ConversationItem::FunctionCall {
            call_id: call.call_id.clone(),
            name: call.name.clone(),
            arguments: call.arguments.clone(),
        }
    }

    pub fn function_call_output(result: &ToolResult) -> Self {
        ConversationItem::FunctionCallOutput {
            call_id: result.call_id.clone(),
            output: result.payload(),
        }
    }
}

impl From<Message> for ConversationItem {
    fn from(message: Message) -> Self {
        ConversationItem::Message(message)
    }
}

/// Ordered conversation sent to the model.
///
/// Owned by a single extraction for its whole lifetime and mutated only by
/// the tool chain, sequentially: calls are appended first, outputs later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    items: Vec<ConversationItem>,
}

impl Conversation {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a conversation from a system prompt and a user message.
    pub fn from_prompt(system: impl Into<String>, user: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.push(Message::system(system));
        conversation.push(Message::user(user));
        conversation
    }

    pub fn push(&mut self, item: impl Into<ConversationItem>) {
        self.items.push(item.into());
    }

    /// Append one `function_call` entry per planned call, in order.
    pub fn append_function_calls(&mut self, calls: &[ToolCall]) {
        self.items
            .extend(calls.iter().map(ConversationItem::function_call));
    }

    /// Append one `function_call_output` entry per result, in order.
    pub fn append_function_outputs(&mut self, results: &[ToolResult]) {
        self.items
            .extend(results.iter().map(ConversationItem::function_call_output));
    }

    pub fn items(&self) -> &[ConversationItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Call ids of `function_call` entries that have no output yet.
    pub fn pending_call_ids(&self) -> Vec<&str> {
        let answered: HashSet<&str> = self
            .items
            .iter()
            .filter_map(|item| match item {
                ConversationItem::FunctionCallOutput { call_id, .. } => Some(call_id.as_str()),
                _ => None,
            })
            .collect();

        self.items
            .iter()
            .filter_map(|item| match item {
                ConversationItem::FunctionCall { call_id, .. }
                    if !answered.contains(call_id.as_str()) =>
                {
                    Some(call_id.as_str())
                }
                _ => None,
            })
            .collect()
    }
}

impl From<Vec<ConversationItem>> for Conversation {
    fn from(items: Vec<ConversationItem>) -> Self {
        Self { items }
    }
}
