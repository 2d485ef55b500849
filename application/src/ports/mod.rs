//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chain_observer;
pub mod llm_gateway;
pub mod record_fetcher;
pub mod tool_handler;
