//! Tool domain module
//!
//! This module defines the core abstractions of the **tool chain**: how a
//! model's function-calling response is turned into concrete, isolated
//! invocations of external capabilities (database fetchers, search) whose
//! outcomes flow back into the conversation as data.
//!
//! # Overview
//!
//! Every tool is declared by a [`ToolSpec`] (name, JSON argument schema,
//! strictness), invoked via a [`ToolCall`] produced by the planning
//! round-trip, and settles into exactly one [`ToolResult`].
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (declared)   │    │ (call_id,    │    │ (call_id,    │
//! │              │    │  raw args)   │    │  payload)    │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Failure as Data
//!
//! Tool failures never abort a batch. Each failure is converted into a
//! JSON error envelope (`{"error": {"code": ..., "message": ...}}`) so the
//! model can read it on its next turn:
//!
//! | Code | Retryable? | Origin |
//! |------|-----------|--------|
//! | `INVALID_ARGUMENTS` | No | Malformed JSON or schema mismatch |
//! | `UNKNOWN_TOOL` | No | Name not in the registry |
//! | `EXECUTION_FAILED` | Yes | Handler returned an error or panicked |
//! | `TIMEOUT` | Yes | Handler exceeded the wall-clock budget |
//!
//! # Key Types
//!
//! - [`ToolSpec`]: declared capability offered to the model
//! - [`ToolCall`]: a model-requested invocation with raw argument text
//! - [`ToolOutput`]: what a handler produces on success
//! - [`ToolResult`]: the paired outcome, success payload or error envelope
//! - [`BackoffPolicy`] / [`JitterSource`]: pure retry delay computation
//! - [`estimate_size`]: best-effort result size hint for lifecycle events
//! - [`ToolArgumentValidator`]: pure argument validation against a spec

pub mod backoff;
pub mod entities;
pub mod size;
pub mod traits;
pub mod value_objects;

pub use backoff::{BackoffPolicy, FixedJitter, JitterSource, NoJitter};
pub use entities::{ToolCall, ToolSpec};
pub use size::estimate_size;
pub use traits::{DefaultToolValidator, ToolArgumentValidator};
pub use value_objects::{ToolError, ToolOutput, ToolResult, ToolResultMetadata};
