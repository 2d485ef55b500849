//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod database_search;
pub mod event_sink;
pub mod execute_tool;
pub mod extract_data;
pub mod run_tool_chain;
pub mod scheduler;
pub mod stream_aggregator;
pub mod tool_registry;

#[cfg(test)]
pub(crate) mod test_support;
