//! Tool domain value objects: immutable result and error types
//!
//! These types form the **output side** of the tool chain. Every executed
//! [`ToolCall`](super::ToolCall) settles into exactly one [`ToolResult`]
//! carrying either a JSON-serialized success payload or a JSON error
//! envelope, plus [`ToolResultMetadata`] (timing, attempts, size hint).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error that occurred while executing a tool call.
///
/// | Code | Retryable? | Description |
/// |------|-----------|-------------|
/// | `INVALID_ARGUMENTS` | No | Malformed JSON or arguments rejected by the ToolSpec |
/// | `UNKNOWN_TOOL` | No | No handler registered under the name |
/// | `EXECUTION_FAILED` | Yes | Handler returned an error or panicked |
/// | other | Yes | Handler-defined failure |
/// | `TIMEOUT` | Yes | Handler exceeded its wall-clock budget |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "UNKNOWN_TOOL", "TIMEOUT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub const INVALID_ARGUMENTS: &'static str = "INVALID_ARGUMENTS";
    pub const UNKNOWN_TOOL: &'static str = "UNKNOWN_TOOL";
    pub const EXECUTION_FAILED: &'static str = "EXECUTION_FAILED";
    pub const TIMEOUT: &'static str = "TIMEOUT";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_ARGUMENTS, message)
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::new(Self::UNKNOWN_TOOL, format!("Unknown tool: {}", name.into()))
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(Self::EXECUTION_FAILED, message)
    }

    pub fn timeout(timeout_ms: u64) -> Self {
        Self::new(
            Self::TIMEOUT,
            format!("Tool call timed out after {}ms", timeout_ms),
        )
    }

    /// Whether the executor may retry after this error.
    ///
    /// Argument and resolution errors are terminal; every other code,
    /// including handler-defined ones, is retried within the budget.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self.code.as_str(),
            Self::INVALID_ARGUMENTS | Self::UNKNOWN_TOOL
        )
    }

    /// Serialize as the `{"error": {...}}` envelope placed in the conversation.
    pub fn to_envelope(&self) -> String {
        serde_json::json!({ "error": self }).to_string()
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// What a tool handler produces on success.
///
/// The variants exist so the size hint can tell text, byte buffers and
/// structured values apart without inspecting runtime types.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Bytes(Vec<u8>),
    Json(Value),
}

impl ToolOutput {
    /// JSON-serialize the output into the payload stored in the conversation.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        match self {
            ToolOutput::Text(s) => serde_json::to_string(s),
            ToolOutput::Bytes(b) => serde_json::to_string(b),
            ToolOutput::Json(v) => serde_json::to_string(v),
        }
    }

    /// Best-effort size hint, see [`estimate_size`](super::size::estimate_size).
    pub fn size_hint(&self) -> Option<usize> {
        super::size::estimate_size(self)
    }
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        ToolOutput::Json(value)
    }
}

impl From<String> for ToolOutput {
    fn from(value: String) -> Self {
        ToolOutput::Text(value)
    }
}

impl From<&str> for ToolOutput {
    fn from(value: &str) -> Self {
        ToolOutput::Text(value.to_string())
    }
}

impl From<Vec<u8>> for ToolOutput {
    fn from(value: Vec<u8>) -> Self {
        ToolOutput::Bytes(value)
    }
}

/// Outcome of one executed tool call.
///
/// Exactly one of `output` / `error` is set. Results are paired back to
/// their calls by `call_id`, never by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Identifier of the originating call
    pub call_id: String,
    /// Name of the tool that was requested
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// JSON-serialized payload (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about a tool execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Wall-clock duration across all attempts, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Number of handler invocations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    /// Best-effort size of the successful result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_size: Option<usize>,
}

impl ToolResult {
    /// Create a successful result from an already serialized payload
    pub fn success(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            success: true,
            output: Some(payload.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        error: ToolError,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    /// Add attempt count metadata
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.metadata.attempts = Some(attempts);
        self
    }

    /// Add result size metadata
    pub fn with_result_size(mut self, size: Option<usize>) -> Self {
        self.metadata.result_size = size;
        self
    }

    /// Check if execution was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get the success payload
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Get the error
    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// The text placed in the `function_call_output` entry: the success
    /// payload, or the JSON error envelope.
    pub fn payload(&self) -> String {
        match (&self.output, &self.error) {
            (Some(output), _) => output.clone(),
            (None, Some(error)) => error.to_envelope(),
            (None, None) => ToolError::execution_failed("Tool produced no output").to_envelope(),
        }
    }
}
