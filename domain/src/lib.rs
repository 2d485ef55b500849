//! Domain layer for enzymeml-llm
//!
//! This crate contains the entities and value objects of the LLM tool chain.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tool chain
//!
//! A model is asked to plan tool calls for a [`Conversation`]. Every planned
//! [`ToolCall`] yields exactly one [`ToolResult`], and both are spliced back
//! into the conversation before it is sent onward:
//!
//! ```text
//! Conversation ─▶ plan ─▶ [ToolCall] ─▶ execute ─▶ [ToolResult] ─▶ Conversation'
//! ```
//!
//! ## Streaming
//!
//! The final extraction request is streamed. Provider [`StreamEvent`]s are
//! narrowed to [`StreamItem`]s (text, refusal, error) for consumers.

pub mod chain;
pub mod conversation;
pub mod core;
pub mod database;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use chain::{ChainContext, ChainEvent, ChainEventKind, ChainMetadata};
pub use conversation::{Conversation, ConversationItem, Message, Role};
pub use core::{error::DomainError, model::Model};
pub use database::{DATABASE_SEARCH_TOOL, Database, database_search_spec};
pub use session::{
    request::{ModelRequest, OutputSchema, ToolChoice},
    response::{PlanningResponse, ResponseItem},
    stream::{StreamEvent, StreamItem},
};
pub use tool::{
    BackoffPolicy, DefaultToolValidator, FixedJitter, JitterSource, NoJitter, ToolArgumentValidator,
    ToolCall, ToolError, ToolOutput, ToolResult, ToolResultMetadata, ToolSpec, estimate_size,
};
