//! Model session domain.
//!
//! Provider-neutral shapes exchanged with the LLM gateway:
//!
//! - [`request::ModelRequest`]: planning and streaming request shape
//! - [`response::PlanningResponse`]: response items of a blocking planning call
//! - [`stream::StreamEvent`]: raw provider stream events
//! - [`stream::StreamItem`]: the increments exposed to consumers

pub mod request;
pub mod response;
pub mod stream;
