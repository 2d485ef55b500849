//! Best-effort size hint for tool outputs.
//!
//! The hint attached to `tool_success` events is computed by trying a short,
//! ordered list of typed predicates and taking the first that applies:
//!
//! 1. text length (characters)
//! 2. sequence length (JSON array items)
//! 3. byte length (raw buffers)
//! 4. serialized JSON length
//!
//! If none applies (a JSON `null`) the hint is `None`. The function is total
//! and never panics.

use super::value_objects::ToolOutput;
use serde_json::Value;

type SizeEstimator = fn(&ToolOutput) -> Option<usize>;

const ESTIMATORS: [SizeEstimator; 4] = [text_length, sequence_length, byte_length, serialized_length];

/// Estimate the size of a tool output.
pub fn estimate_size(output: &ToolOutput) -> Option<usize> {
    ESTIMATORS.iter().find_map(|estimate| estimate(output))
}

fn text_length(output: &ToolOutput) -> Option<usize> {
    match output {
        ToolOutput::Text(s) | ToolOutput::Json(Value::String(s)) => Some(s.chars().count()),
        _ => None,
    }
}

fn sequence_length(output: &ToolOutput) -> Option<usize> {
    match output {
        ToolOutput::Json(Value::Array(items)) => Some(items.len()),
        _ => None,
    }
}

fn byte_length(output: &ToolOutput) -> Option<usize> {
    match output {
        ToolOutput::Bytes(bytes) => Some(bytes.len()),
        _ => None,
    }
}

fn serialized_length(output: &ToolOutput) -> Option<usize> {
    match output {
        ToolOutput::Json(Value::Null) => None,
        ToolOutput::Json(value) => serde_json::to_string(value).ok().map(|s| s.len()),
        _ => None,
    }
}
