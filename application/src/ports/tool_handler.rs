//! Tool handler port
//!
//! A [`ToolHandler`] is the async callable behind a tool name. Closures are
//! adapted with [`handler_fn`] (async) and [`sync_handler_fn`] (blocking
//! logic that completes immediately). Both kinds go through the same
//! executor path, so a panic in a sync closure and an `Err` from an async
//! one end up as the same retryable failure.

use async_trait::async_trait;
use enzymeml_domain::{ToolError, ToolOutput};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Async tool implementation.
///
/// `cancel` is triggered when the current attempt times out. Handlers that
/// hold external resources should watch it and stop early; handlers that
/// ignore it are simply dropped at the next await point.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(
        &self,
        arguments: Value,
        cancel: CancellationToken,
    ) -> Result<ToolOutput, ToolError>;
}

/// Adapter for async closures.
pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Value, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolOutput, ToolError>> + Send + 'static,
{
    async fn call(
        &self,
        arguments: Value,
        cancel: CancellationToken,
    ) -> Result<ToolOutput, ToolError> {
        (self.f)(arguments, cancel).await
    }
}

/// Adapter for synchronous closures.
pub struct SyncFnHandler<F> {
    f: F,
}

#[async_trait]
impl<F> ToolHandler for SyncFnHandler<F>
where
    F: Fn(Value) -> Result<ToolOutput, ToolError> + Send + Sync + 'static,
{
    async fn call(
        &self,
        arguments: Value,
        _cancel: CancellationToken,
    ) -> Result<ToolOutput, ToolError> {
        (self.f)(arguments)
    }
}

/// Wrap an async closure as a shared handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(Value, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolOutput, ToolError>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}

/// Wrap a synchronous closure as a shared handler.
pub fn sync_handler_fn<F>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(Value) -> Result<ToolOutput, ToolError> + Send + Sync + 'static,
{
    Arc::new(SyncFnHandler { f })
}
