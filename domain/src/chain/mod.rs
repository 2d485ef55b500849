//! Tool-chain lifecycle domain.
//!
//! A chain run emits [`ChainEvent`]s at each state transition:
//!
//! ```text
//! chain_start ─▶ (no_tools ─▶ chain_complete)
//!             └▶ planning_result ─▶ tool_start* ─▶ (tool_retry*) ─▶ tool_success|tool_error
//!                                ─▶ outputs_appended ─▶ chain_complete
//! ```
//!
//! Every event carries a fresh [`ChainMetadata`] snapshot produced from the
//! run's [`ChainContext`]. Events are delivered to observers and never
//! stored by the chain itself.

pub mod events;

pub use events::{ChainContext, ChainEvent, ChainEventKind, ChainMetadata};
