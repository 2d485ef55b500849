//! LLM Gateway port
//!
//! Defines the interface for communicating with the model provider. Two
//! calls are needed by the tool chain:
//!
//! - [`LlmGateway::plan`]: a blocking request that returns function-call items
//! - [`LlmGateway::stream`]: a streaming request returning a [`ProviderStream`]

use async_trait::async_trait;
use enzymeml_domain::{ModelRequest, PlanningResponse, StreamEvent};
use futures::future::BoxFuture;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Transport closed")]
    TransportClosed,

    #[error("Other error: {0}")]
    Other(String),
}

/// Future resolving to the final structured output of a streaming request.
pub type Completion = BoxFuture<'static, Result<Value, GatewayError>>;

/// Handle to an in-flight streaming request.
///
/// `events` receives every provider event in arrival order. `completion`
/// resolves independently once the provider has finished (successfully or
/// not); the sender side of `events` may still hold undelivered items at
/// that moment.
pub struct ProviderStream {
    pub events: mpsc::UnboundedReceiver<StreamEvent>,
    pub completion: Completion,
}

impl ProviderStream {
    pub fn new(
        events: mpsc::UnboundedReceiver<StreamEvent>,
        completion: impl Future<Output = Result<Value, GatewayError>> + Send + 'static,
    ) -> Self {
        Self {
            events,
            completion: Box::pin(completion),
        }
    }

    /// Build a stream whose events are all already delivered.
    ///
    /// Useful for providers that only answer in one piece and for tests.
    pub fn replay(events: Vec<StreamEvent>, outcome: Result<Value, GatewayError>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        for event in events {
            // Receiver is held by `rx` below, send cannot fail here
            let _ = tx.send(event);
        }
        Self::new(rx, async move { outcome })
    }
}

impl std::fmt::Debug for ProviderStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderStream").finish_non_exhaustive()
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with the model
/// provider. Implementations (adapters) own the transport and the
/// provider-specific wire format.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a planning request and wait for the full response.
    async fn plan(&self, request: ModelRequest) -> Result<PlanningResponse, GatewayError>;

    /// Open a streaming request.
    async fn stream(&self, request: ModelRequest) -> Result<ProviderStream, GatewayError>;
}
