//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: LLM models the extraction pipeline can target
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: UTF-8 safe truncation for previews and log lines

pub mod error;
pub mod model;
pub mod string;
