//! Conversation domain module
//!
//! A [`Conversation`] is the ordered input sent to the model: role-tagged
//! messages plus, while a tool chain runs, `function_call` entries and their
//! matching `function_call_output` entries.

pub mod entities;

pub use entities::{Conversation, ConversationItem, Message, Role};
