//! Execute Tool use case.
//!
//! Runs one [`ToolCall`] to completion and always settles into a
//! [`ToolResult`]:
//!
//! ```text
//! tool_start
//!   │
//!   ├─ parse arguments ──✗──▶ tool_error (INVALID_ARGUMENTS)
//!   ├─ resolve handler ──✗──▶ tool_error (UNKNOWN_TOOL)
//!   ├─ validate vs spec ─✗──▶ tool_error (INVALID_ARGUMENTS)
//!   │
//!   └─ attempt ◀───────────────────────┐
//!        ├─ ok ──▶ tool_success        │
//!        └─ err/timeout/panic          │
//!             ├─ budget left ─▶ tool_retry ─▶ sleep(backoff)
//!             └─ exhausted ──▶ tool_error
//! ```

use crate::config::ExecutionParams;
use crate::ports::tool_handler::ToolHandler;
use crate::use_cases::event_sink::EventSink;
use crate::use_cases::tool_registry::ToolRegistry;
use enzymeml_domain::core::string::truncate;
use enzymeml_domain::{
    ChainEventKind, DefaultToolValidator, JitterSource, ToolArgumentValidator, ToolCall, ToolError,
    ToolOutput, ToolResult, estimate_size,
};
use futures::FutureExt;
use rand::Rng;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Jitter drawn uniformly from `[1, 2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn jitter(&self) -> f64 {
        rand::rng().random_range(1.0..2.0)
    }
}

/// Executes single tool calls against a registry.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    params: ExecutionParams,
    jitter: Arc<dyn JitterSource>,
    validator: DefaultToolValidator,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>, params: ExecutionParams) -> Self {
        Self {
            registry,
            params,
            jitter: Arc::new(RandomJitter),
            validator: DefaultToolValidator,
        }
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    /// Execute one call. Never panics and never returns an error: every
    /// failure becomes an error [`ToolResult`].
    pub async fn execute(&self, call: &ToolCall, sink: &EventSink) -> ToolResult {
        let started = Instant::now();
        sink.emit(ChainEventKind::ToolStart {
            call_id: call.call_id.clone(),
            name: call.name.clone(),
            index: call.index,
        });
        debug!(tool = %call.name, call_id = %call.call_id, "Tool call started");

        let arguments = match call.parse_arguments() {
            Ok(arguments) => arguments,
            Err(e) => {
                let error = ToolError::invalid_arguments(format!(
                    "Invalid JSON arguments for tool '{}': {}",
                    call.name, e
                ))
                .with_details(call.arguments.clone());
                return self.fail(call, sink, error, started, 0);
            }
        };

        let tool = match self.registry.resolve(&call.name) {
            Ok(tool) => tool,
            Err(error) => return self.fail(call, sink, error, started, 0),
        };

        if let Some(spec) = tool.spec
            && let Err(message) = self.validator.validate(&arguments, spec)
        {
            let error = ToolError::invalid_arguments(message).with_details(call.arguments.clone());
            return self.fail(call, sink, error, started, 0);
        }

        let max_attempts = self.params.max_attempts();
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let error = match self.attempt(&tool.handler, arguments.clone()).await {
                Ok(output) => return self.succeed(call, sink, output, started, attempt),
                Err(error) => error,
            };

            if attempt >= max_attempts || !error.is_retryable() {
                return self.fail(call, sink, error, started, attempt);
            }

            let delay = self.params.backoff.delay(attempt - 1, self.jitter.jitter());
            warn!(
                tool = %call.name,
                call_id = %call.call_id,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Tool call failed, retrying: {}",
                truncate(&error.message, 200)
            );
            sink.emit(ChainEventKind::ToolRetry {
                call_id: call.call_id.clone(),
                name: call.name.clone(),
                attempt,
                next_delay_ms: delay.as_millis() as u64,
                error,
            });
            tokio::time::sleep(delay).await;
        }
    }

    /// One handler invocation under the timeout, with panics caught.
    async fn attempt(
        &self,
        handler: &Arc<dyn ToolHandler>,
        arguments: Value,
    ) -> Result<ToolOutput, ToolError> {
        let cancel = CancellationToken::new();
        let invocation = AssertUnwindSafe(handler.call(arguments, cancel.clone())).catch_unwind();

        match tokio::time::timeout(self.params.timeout, invocation).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(ToolError::execution_failed(format!(
                "Tool handler panicked: {}",
                panic_message(panic.as_ref())
            ))),
            Err(_) => {
                cancel.cancel();
                Err(ToolError::timeout(self.params.timeout.as_millis() as u64))
            }
        }
    }

    fn succeed(
        &self,
        call: &ToolCall,
        sink: &EventSink,
        output: ToolOutput,
        started: Instant,
        attempts: u32,
    ) -> ToolResult {
        let payload = match output.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                let error =
                    ToolError::execution_failed(format!("Tool output is not serializable: {}", e));
                return self.fail(call, sink, error, started, attempts);
            }
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        let result_size = estimate_size(&output);
        sink.emit(ChainEventKind::ToolSuccess {
            call_id: call.call_id.clone(),
            name: call.name.clone(),
            duration_ms,
            result_size,
            attempts,
        });
        debug!(
            tool = %call.name,
            call_id = %call.call_id,
            duration_ms,
            attempts,
            "Tool call succeeded"
        );

        ToolResult::success(&call.call_id, &call.name, payload)
            .with_duration(duration_ms)
            .with_attempts(attempts)
            .with_result_size(result_size)
    }

    fn fail(
        &self,
        call: &ToolCall,
        sink: &EventSink,
        error: ToolError,
        started: Instant,
        attempts: u32,
    ) -> ToolResult {
        let duration_ms = started.elapsed().as_millis() as u64;
        warn!(
            tool = %call.name,
            call_id = %call.call_id,
            code = %error.code,
            attempts,
            "Tool call failed: {}",
            truncate(&error.message, 200)
        );
        sink.emit(ChainEventKind::ToolError {
            call_id: call.call_id.clone(),
            name: call.name.clone(),
            duration_ms,
            attempts,
            error: error.clone(),
        });

        ToolResult::failure(&call.call_id, &call.name, error)
            .with_duration(duration_ms)
            .with_attempts(attempts)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::chain_observer::RecordingChainObserver;
    use crate::ports::tool_handler::{handler_fn, sync_handler_fn};
    use enzymeml_domain::{BackoffPolicy, ChainContext, FixedJitter, NoJitter, ToolSpec};
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    // ==================== Helper ====================

    fn sink() -> (EventSink, Arc<RecordingChainObserver>) {
        let observer = Arc::new(RecordingChainObserver::new());
        let sink = EventSink::new(ChainContext::new("gpt-4.1", 1, 1), Some(observer.clone()));
        (sink, observer)
    }

    fn executor(registry: ToolRegistry, params: ExecutionParams) -> ToolExecutor {
        ToolExecutor::new(Arc::new(registry), params).with_jitter(Arc::new(NoJitter))
    }

    fn fast_params() -> ExecutionParams {
        ExecutionParams::default()
            .with_timeout(Duration::from_millis(100))
            .with_backoff(BackoffPolicy::new(
                Duration::from_millis(10),
                2.0,
                Duration::from_secs(1),
            ))
    }

    fn ok_tool(name: &str) -> ToolRegistry {
        ToolRegistry::new().register(
            ToolSpec::new(name, "test tool"),
            sync_handler_fn(|_| Ok(ToolOutput::Json(json!({"hits": 3})))),
        )
    }

    fn payload_of(result: &ToolResult) -> Value {
        serde_json::from_str(&result.payload()).unwrap()
    }

    // ==================== Argument handling ====================

    #[tokio::test]
    async fn test_malformed_arguments_yield_error_payload() {
        let executor = executor(ok_tool("lookup"), fast_params());

        for raw in [r#"{"id": "#, "not json", "[1,", r#"{"a":}"#, "\u{0}", "", "   "] {
            let (sink, observer) = sink();
            let call = ToolCall::new("c1", "lookup", raw);
            let result = executor.execute(&call, &sink).await;

            assert!(!result.is_success(), "{raw:?} should fail");
            let payload = payload_of(&result);
            assert_eq!(payload["error"]["code"], ToolError::INVALID_ARGUMENTS);
            assert_eq!(payload["error"]["details"], raw);
            assert_eq!(observer.names(), vec!["tool_start", "tool_error"]);
        }
    }

    #[tokio::test]
    async fn test_empty_arguments_never_reach_the_handler() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let registry = ToolRegistry::new().register(
            ToolSpec::new("lookup", "test tool"),
            sync_handler_fn(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(ToolOutput::Text("ran".to_string()))
            }),
        );
        let executor = executor(registry, fast_params());
        let (sink, _) = sink();

        let result = executor.execute(&ToolCall::new("c1", "lookup", ""), &sink).await;

        let error = result.error().unwrap();
        assert_eq!(error.code, ToolError::INVALID_ARGUMENTS);
        assert_eq!(error.details.as_deref(), Some(""));
        assert_eq!(result.metadata.attempts, Some(0));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_retried() {
        let executor = executor(ok_tool("lookup"), fast_params());
        let (sink, observer) = sink();

        let result = executor
            .execute(&ToolCall::new("c1", "missing", "{}"), &sink)
            .await;

        assert_eq!(result.error().unwrap().code, ToolError::UNKNOWN_TOOL);
        assert_eq!(result.metadata.attempts, Some(0));
        assert_eq!(observer.count("tool_retry"), 0);
    }

    #[tokio::test]
    async fn test_strict_spec_rejects_unknown_arguments() {
        let registry = ToolRegistry::new().register(
            ToolSpec::new("lookup", "test")
                .with_parameters(json!({
                    "type": "object",
                    "properties": {"id": {"type": "string"}},
                    "required": ["id"]
                }))
                .with_strict(true),
            sync_handler_fn(|_| Ok(ToolOutput::Text("ok".to_string()))),
        );
        let executor = executor(registry, fast_params());
        let (sink, _) = sink();

        let missing = executor.execute(&ToolCall::new("c1", "lookup", "{}"), &sink).await;
        assert!(missing.error().unwrap().message.contains("Missing required parameter 'id'"));

        let extra = executor
            .execute(&ToolCall::new("c2", "lookup", r#"{"id":"1","x":2}"#), &sink)
            .await;
        assert!(extra.error().unwrap().message.contains("Unknown parameter 'x'"));

        let ok = executor
            .execute(&ToolCall::new("c3", "lookup", r#"{"id":"1"}"#), &sink)
            .await;
        assert_eq!(ok.output(), Some("\"ok\""));
    }

    // ==================== Timeout ====================

    #[tokio::test(start_paused = true)]
    async fn test_hanging_handler_times_out() {
        let cancelled = Arc::new(AtomicU32::new(0));
        let seen = cancelled.clone();
        let registry = ToolRegistry::new().register(
            ToolSpec::new("hang", "never resolves"),
            handler_fn(move |_, cancel: CancellationToken| {
                let seen = seen.clone();
                async move {
                    tokio::spawn(async move {
                        cancel.cancelled().await;
                        seen.fetch_add(1, Ordering::SeqCst);
                    });
                    futures::future::pending::<Result<ToolOutput, ToolError>>().await
                }
            }),
        );
        let executor = executor(registry, fast_params().with_retries(0));
        let (sink, observer) = sink();

        let started = Instant::now();
        let result = executor.execute(&ToolCall::new("c1", "hang", "{}"), &sink).await;

        assert_eq!(started.elapsed(), Duration::from_millis(100));
        let error = result.error().unwrap();
        assert_eq!(error.code, ToolError::TIMEOUT);
        assert_eq!(error.message, "Tool call timed out after 100ms");
        assert_eq!(observer.names(), vec!["tool_start", "tool_error"]);

        tokio::task::yield_now().await;
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }

    // ==================== Retry ====================

    #[tokio::test(start_paused = true)]
    async fn test_retry_bound() {
        for retries in 0..4u32 {
            let calls = Arc::new(AtomicU32::new(0));
            let counter = calls.clone();
            let registry = ToolRegistry::new().register(
                ToolSpec::new("flaky", "always fails"),
                sync_handler_fn(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(ToolError::execution_failed("upstream 503"))
                }),
            );
            let executor = executor(registry, fast_params().with_retries(retries));
            let (sink, observer) = sink();

            let result = executor.execute(&ToolCall::new("c1", "flaky", "{}"), &sink).await;

            assert_eq!(calls.load(Ordering::SeqCst), retries + 1);
            assert_eq!(result.metadata.attempts, Some(retries + 1));
            assert_eq!(result.error().unwrap().message, "upstream 503");

            let attempts: Vec<u32> = observer
                .events()
                .into_iter()
                .filter_map(|event| match event.kind {
                    ChainEventKind::ToolRetry { attempt, .. } => Some(attempt),
                    _ => None,
                })
                .collect();
            assert_eq!(attempts, (1..=retries).collect::<Vec<_>>());
            assert_eq!(observer.count("tool_error"), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_delays_follow_backoff() {
        let registry = ToolRegistry::new().register(
            ToolSpec::new("flaky", "always fails"),
            sync_handler_fn(|_| Err(ToolError::execution_failed("boom"))),
        );
        let executor = ToolExecutor::new(Arc::new(registry), fast_params().with_retries(3))
            .with_jitter(Arc::new(FixedJitter(1.5)));
        let (sink, observer) = sink();

        let started = Instant::now();
        executor.execute(&ToolCall::new("c1", "flaky", "{}"), &sink).await;

        let delays: Vec<u64> = observer
            .events()
            .into_iter()
            .filter_map(|event| match event.kind {
                ChainEventKind::ToolRetry { next_delay_ms, .. } => Some(next_delay_ms),
                _ => None,
            })
            .collect();
        assert_eq!(delays, vec![15, 30, 60]);
        assert_eq!(started.elapsed(), Duration::from_millis(105));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let registry = ToolRegistry::new().register(
            ToolSpec::new("flaky", "fails once"),
            sync_handler_fn(move |_| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ToolError::execution_failed("first call fails"))
                } else {
                    Ok(ToolOutput::Text("ok".to_string()))
                }
            }),
        );
        let executor = executor(registry, fast_params());
        let (sink, observer) = sink();

        let result = executor.execute(&ToolCall::new("c1", "flaky", "{}"), &sink).await;

        assert!(result.is_success());
        assert_eq!(result.metadata.attempts, Some(2));
        assert_eq!(observer.names(), vec!["tool_start", "tool_retry", "tool_success"]);
    }

    #[tokio::test]
    async fn test_handler_invalid_arguments_are_terminal() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let registry = ToolRegistry::new().register(
            ToolSpec::new("picky", "rejects input"),
            sync_handler_fn(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(ToolError::invalid_arguments("unsupported database"))
            }),
        );
        let executor = executor(registry, fast_params());
        let (sink, _) = sink();

        let result = executor.execute(&ToolCall::new("c1", "picky", "{}"), &sink).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.error().unwrap().code, ToolError::INVALID_ARGUMENTS);
    }

    // ==================== Panics ====================

    #[tokio::test(start_paused = true)]
    async fn test_panicking_handler_is_normalized() {
        let registry = ToolRegistry::new().register(
            ToolSpec::new("explode", "panics"),
            sync_handler_fn(|_| panic!("handler exploded")),
        );
        let executor = executor(registry, fast_params().with_retries(1));
        let (sink, observer) = sink();

        let result = executor.execute(&ToolCall::new("c1", "explode", "{}"), &sink).await;

        let error = result.error().unwrap();
        assert_eq!(error.code, ToolError::EXECUTION_FAILED);
        assert_eq!(error.message, "Tool handler panicked: handler exploded");
        assert_eq!(observer.count("tool_retry"), 1);
    }

    // ==================== Success ====================

    #[tokio::test(start_paused = true)]
    async fn test_success_reports_duration_and_size() {
        let registry = ToolRegistry::new().register(
            ToolSpec::new("slow", "5ms"),
            handler_fn(|_, _| async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(ToolOutput::Json(json!({"hits": 3})))
            }),
        );
        let executor = executor(registry, fast_params());
        let (sink, observer) = sink();

        let result = executor
            .execute(&ToolCall::new("c1", "slow", "{}").with_index(0), &sink)
            .await;

        assert_eq!(result.output(), Some(r#"{"hits":3}"#));
        assert_eq!(result.metadata.duration_ms, Some(5));
        assert_eq!(result.metadata.result_size, Some(10));

        let events = observer.events();
        assert_eq!(events.len(), 2);
        match &events[1].kind {
            ChainEventKind::ToolSuccess {
                duration_ms,
                result_size,
                attempts,
                ..
            } => {
                assert_eq!(*duration_ms, 5);
                assert_eq!(*result_size, Some(10));
                assert_eq!(*attempts, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_random_jitter_range() {
        for _ in 0..100 {
            let jitter = RandomJitter.jitter();
            assert!((1.0..2.0).contains(&jitter));
        }
    }
}
