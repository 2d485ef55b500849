//! Chain lifecycle events and their metadata.

use crate::tool::ToolError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cross-cutting context of one chain run.
///
/// Immutable for the duration of a planning round; a deeper round uses
/// [`ChainContext::at_depth`] to derive a new context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainContext {
    pub depth: usize,
    pub total_depth: usize,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ChainContext {
    pub fn new(model: impl Into<String>, depth: usize, total_depth: usize) -> Self {
        Self {
            depth,
            total_depth,
            model: model.into(),
            conversation_id: None,
            request_id: None,
        }
    }

    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Same context at another recursion depth.
    pub fn at_depth(&self, depth: usize) -> Self {
        Self {
            depth,
            ..self.clone()
        }
    }

    /// Whether another planning round is allowed after the current one.
    pub fn can_descend(&self) -> bool {
        self.depth < self.total_depth
    }

    /// Metadata snapshot stamped with the current time.
    pub fn snapshot(&self) -> ChainMetadata {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, timestamp: DateTime<Utc>) -> ChainMetadata {
        ChainMetadata {
            depth: self.depth,
            total_depth: self.total_depth,
            model: self.model.clone(),
            conversation_id: self.conversation_id.clone(),
            request_id: self.request_id.clone(),
            timestamp,
        }
    }
}

/// Read-only metadata attached to every [`ChainEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainMetadata {
    pub depth: usize,
    pub total_depth: usize,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Tag-specific payload of a [`ChainEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChainEventKind {
    ChainStart {
        input_len: usize,
    },
    PlanningResult {
        count: usize,
        names: Vec<String>,
        call_ids: Vec<String>,
    },
    NoTools,
    ToolStart {
        call_id: String,
        name: String,
        index: usize,
    },
    ToolRetry {
        call_id: String,
        name: String,
        attempt: u32,
        next_delay_ms: u64,
        error: ToolError,
    },
    ToolSuccess {
        call_id: String,
        name: String,
        duration_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result_size: Option<usize>,
        attempts: u32,
    },
    ToolError {
        call_id: String,
        name: String,
        duration_ms: u64,
        attempts: u32,
        error: ToolError,
    },
    OutputsAppended {
        count: usize,
        duration_ms: u64,
    },
    ChainComplete {
        conversation_len: usize,
    },
}

impl ChainEventKind {
    /// Wire name of the event tag.
    pub fn name(&self) -> &'static str {
        match self {
            ChainEventKind::ChainStart { .. } => "chain_start",
            ChainEventKind::PlanningResult { .. } => "planning_result",
            ChainEventKind::NoTools => "no_tools",
            ChainEventKind::ToolStart { .. } => "tool_start",
            ChainEventKind::ToolRetry { .. } => "tool_retry",
            ChainEventKind::ToolSuccess { .. } => "tool_success",
            ChainEventKind::ToolError { .. } => "tool_error",
            ChainEventKind::OutputsAppended { .. } => "outputs_appended",
            ChainEventKind::ChainComplete { .. } => "chain_complete",
        }
    }
}

/// A lifecycle occurrence of a chain run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEvent {
    pub metadata: ChainMetadata,
    #[serde(flatten)]
    pub kind: ChainEventKind,
}

impl ChainEvent {
    pub fn new(metadata: ChainMetadata, kind: ChainEventKind) -> Self {
        Self { metadata, kind }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}
