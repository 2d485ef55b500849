//! Tool domain traits
//!
//! Contains pure domain logic traits for argument validation.
//! The async tool handler port is defined in the application layer (ports).

use super::entities::ToolSpec;
use serde_json::Value;

/// Validator for parsed tool arguments
///
/// This is a pure domain trait that validates arguments against a
/// [`ToolSpec`] without any I/O operations.
pub trait ToolArgumentValidator {
    /// Validate parsed arguments against the tool's declaration
    fn validate(&self, arguments: &Value, spec: &ToolSpec) -> Result<(), String>;
}

/// Default implementation of ToolArgumentValidator
///
/// Checks that arguments form an object, that every `required` property is
/// present and, for strict specs, that no undeclared property appears.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolArgumentValidator for DefaultToolValidator {
    fn validate(&self, arguments: &Value, spec: &ToolSpec) -> Result<(), String> {
        let Some(args) = arguments.as_object() else {
            return Err(format!(
                "Arguments for tool '{}' must be a JSON object",
                spec.name
            ));
        };

        for required in spec.required_properties() {
            if !args.contains_key(required) {
                return Err(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    required, spec.name
                ));
            }
        }

        if spec.strict {
            let declared: std::collections::HashSet<&str> =
                spec.property_names().into_iter().collect();

            for arg_name in args.keys() {
                if !declared.contains(arg_name.as_str()) {
                    return Err(format!(
                        "Unknown parameter '{}' for tool '{}'",
                        arg_name, spec.name
                    ));
                }
            }
        }

        Ok(())
    }
}
