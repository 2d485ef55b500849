//! Mirrors chain events into `tracing` output.

use enzymeml_application::ChainObserver;
use enzymeml_domain::{ChainEvent, ChainEventKind};
use tracing::{debug, info, warn};

/// Observer that logs each chain event at a level matching its outcome.
///
/// | Event | Level |
/// |-------|-------|
/// | `tool_retry`, `tool_error` | warn |
/// | `chain_start`, `chain_complete`, `planning_result` | info |
/// | everything else | debug |
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingChainObserver;

impl TracingChainObserver {
    pub fn new() -> Self {
        Self
    }
}

impl ChainObserver for TracingChainObserver {
    fn on_event(&self, event: &ChainEvent) {
        let depth = event.metadata.depth;
        match &event.kind {
            ChainEventKind::ChainStart { input_len } => {
                info!(depth, input_len, model = %event.metadata.model, "Chain started");
            }
            ChainEventKind::PlanningResult { count, names, .. } => {
                info!(depth, count, tools = ?names, "Model requested tools");
            }
            ChainEventKind::NoTools => debug!(depth, "Model requested no tools"),
            ChainEventKind::ToolStart {
                call_id, name, index,
            } => debug!(depth, call_id = %call_id, name = %name, index, "Tool call started"),
            ChainEventKind::ToolRetry {
                call_id,
                name,
                attempt,
                next_delay_ms,
                error,
            } => warn!(
                depth,
                call_id = %call_id,
                name = %name,
                attempt,
                next_delay_ms,
                code = %error.code,
                "Tool attempt failed, retrying: {}",
                error.message
            ),
            ChainEventKind::ToolSuccess {
                call_id,
                name,
                duration_ms,
                attempts,
                ..
            } => debug!(depth, call_id = %call_id, name = %name, duration_ms, attempts, "Tool call succeeded"),
            ChainEventKind::ToolError {
                call_id,
                name,
                duration_ms,
                attempts,
                error,
            } => warn!(
                depth,
                call_id = %call_id,
                name = %name,
                duration_ms,
                attempts,
                code = %error.code,
                "Tool call failed: {}",
                error.message
            ),
            ChainEventKind::OutputsAppended { count, duration_ms } => {
                debug!(depth, count, duration_ms, "Tool outputs appended");
            }
            ChainEventKind::ChainComplete { conversation_len } => {
                info!(depth, conversation_len, "Chain complete");
            }
        }
    }
}
