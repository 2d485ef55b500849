//! Concurrency scheduler for a batch of tool calls.
//!
//! Every call becomes its own task. Admission is gated twice: a semaphore
//! caps the number of running executor invocations and an optional
//! [`RateLimit`] window caps how many may start per interval. The batch
//! settles only when every task has settled; a task that dies (panic past
//! the executor, runtime shutdown) becomes an error result for its call.

use crate::config::{RateLimit, SchedulerParams};
use crate::use_cases::event_sink::EventSink;
use crate::use_cases::execute_tool::ToolExecutor;
use enzymeml_domain::{ChainEventKind, ToolCall, ToolError, ToolResult};
use futures::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, warn};

pub struct Scheduler {
    executor: Arc<ToolExecutor>,
    params: SchedulerParams,
}

impl Scheduler {
    pub fn new(executor: Arc<ToolExecutor>, params: SchedulerParams) -> Self {
        Self { executor, params }
    }

    pub fn params(&self) -> &SchedulerParams {
        &self.params
    }

    /// Run all calls and return one result per call, in call order.
    ///
    /// Callers pair results by `call_id`; the order is a convenience.
    pub async fn run(&self, calls: Vec<ToolCall>, sink: &EventSink) -> Vec<ToolResult> {
        let started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.params.cap()));
        let limiter = self
            .params
            .rate_limit
            .clone()
            .map(|limit| Arc::new(RateLimiter::new(limit)));

        debug!(
            count = calls.len(),
            concurrency = self.params.cap(),
            rate_limited = limiter.is_some(),
            "Scheduling tool calls"
        );

        let handles: Vec<_> = calls
            .iter()
            .cloned()
            .map(|call| {
                let executor = Arc::clone(&self.executor);
                let semaphore = Arc::clone(&semaphore);
                let limiter = limiter.clone();
                let sink = sink.clone();
                tokio::spawn(async move {
                    // The semaphore is never closed
                    let _permit = semaphore.acquire_owned().await.ok();
                    let _slot = match &limiter {
                        Some(limiter) => Some(limiter.admit().await),
                        None => None,
                    };
                    executor.execute(&call, &sink).await
                })
            })
            .collect();

        let results: Vec<ToolResult> = calls
            .iter()
            .zip(join_all(handles).await)
            .map(|(call, joined)| match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!(tool = %call.name, call_id = %call.call_id, "Tool task failed: {}", e);
                    ToolResult::failure(
                        &call.call_id,
                        &call.name,
                        ToolError::execution_failed(format!("Tool task failed: {}", e)),
                    )
                }
            })
            .collect();

        sink.emit(ChainEventKind::OutputsAppended {
            count: results.len(),
            duration_ms: started.elapsed().as_millis() as u64,
        });
        results
    }
}

// ==================== Rate Limiting ====================

struct WindowState {
    window_start: Instant,
    started: usize,
    in_flight: usize,
}

/// Start-rate window shared by the tasks of one batch.
struct RateLimiter {
    limit: RateLimit,
    state: Mutex<WindowState>,
}

impl RateLimiter {
    fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            state: Mutex::new(WindowState {
                window_start: Instant::now(),
                started: 0,
                in_flight: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WindowState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Wait for a start slot in the current window.
    async fn admit(self: &Arc<Self>) -> RateSlot {
        let max_tasks = self.limit.max_tasks.max(1);
        loop {
            let wait = {
                let mut state = self.lock();
                let now = Instant::now();
                let window_end = state.window_start + self.limit.interval;
                if now >= window_end {
                    state.window_start = now;
                    state.started = if self.limit.carry_over {
                        state.in_flight
                    } else {
                        0
                    };
                }

                if state.started < max_tasks {
                    state.started += 1;
                    state.in_flight += 1;
                    None
                } else {
                    Some((state.window_start + self.limit.interval).saturating_duration_since(now))
                }
            };

            match wait {
                None => {
                    return RateSlot {
                        limiter: Arc::clone(self),
                    };
                }
                Some(wait) => tokio::time::sleep(wait).await,
            }
        }
    }
}

/// Held while an admitted task runs.
struct RateSlot {
    limiter: Arc<RateLimiter>,
}

impl Drop for RateSlot {
    fn drop(&mut self) {
        let mut state = self.limiter.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}
