//! Tool-chain configuration container.
//!
//! [`ChainConfig`] groups the split configuration types a chain run needs:
//!
//! | Type | Used by |
//! |------|---------|
//! | [`ExecutionParams`] | Executor (timeout, retries, backoff) |
//! | [`SchedulerParams`] | Scheduler (concurrency cap, rate limit) |
//! | depth / ids | Orchestrator (loop predicate, event metadata) |
//!
//! Use cases receive only the slices they need.

use crate::config::{ExecutionParams, SchedulerParams};
use enzymeml_domain::{ChainContext, DomainError, Model};

#[derive(Debug, Clone, PartialEq)]
pub struct ChainConfig {
    /// Depth of the first planning round (1-based).
    pub depth: usize,
    /// Last depth at which another round may start.
    pub total_depth: usize,
    pub conversation_id: Option<String>,
    pub request_id: Option<String>,
    pub execution: ExecutionParams,
    pub scheduler: SchedulerParams,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            total_depth: 1,
            conversation_id: None,
            request_id: None,
            execution: ExecutionParams::default(),
            scheduler: SchedulerParams::default(),
        }
    }
}

impl ChainConfig {
    // ==================== Builder Methods ====================

    pub fn with_depth(mut self, depth: usize, total_depth: usize) -> Self {
        self.depth = depth;
        self.total_depth = total_depth;
        self
    }

    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_scheduler(mut self, scheduler: SchedulerParams) -> Self {
        self.scheduler = scheduler;
        self
    }

    // ==================== Validation ====================

    /// Check the depth pair. `depth` starts at 1 and may not exceed
    /// `total_depth`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.depth == 0 || self.depth > self.total_depth {
            return Err(DomainError::InvalidDepth {
                depth: self.depth,
                total_depth: self.total_depth,
            });
        }
        Ok(())
    }

    /// Event context for the first planning round.
    pub fn context(&self, model: &Model) -> ChainContext {
        let mut context = ChainContext::new(model.as_str(), self.depth, self.total_depth);
        if let Some(id) = &self.conversation_id {
            context = context.with_conversation_id(id);
        }
        if let Some(id) = &self.request_id {
            context = context.with_request_id(id);
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_round() {
        let config = ChainConfig::default();
        assert_eq!((config.depth, config.total_depth), (1, 1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_depth() {
        assert!(ChainConfig::default().with_depth(0, 1).validate().is_err());
        assert!(ChainConfig::default().with_depth(3, 2).validate().is_err());
        assert!(ChainConfig::default().with_depth(1, 3).validate().is_ok());
    }

    #[test]
    fn test_context_carries_ids() {
        let config = ChainConfig::default()
            .with_depth(1, 2)
            .with_conversation_id("conv")
            .with_request_id("req");
        let context = config.context(&Model::O3);

        assert_eq!(context.model, "o3");
        assert_eq!(context.total_depth, 2);
        assert_eq!(context.conversation_id.as_deref(), Some("conv"));
        assert_eq!(context.request_id.as_deref(), Some("req"));
    }
}
