//! Tool registry
//!
//! Static name → handler mapping consulted by the executor. Lookup is an
//! exact match on the caller-registered tools; when that misses, the
//! reserved name [`DATABASE_SEARCH_TOOL`] falls back to the default handler
//! if one is installed.
//!
//! The registry is built once and shared read-only (`Arc<ToolRegistry>`)
//! for the duration of a chain.

use crate::ports::tool_handler::ToolHandler;
use enzymeml_domain::{DATABASE_SEARCH_TOOL, ToolError, ToolSpec, database_search_spec};
use std::collections::HashMap;
use std::sync::Arc;

struct RegisteredTool {
    spec: Option<ToolSpec>,
    handler: Arc<dyn ToolHandler>,
}

/// A handler resolved for one call, with its declaration if known.
pub struct ResolvedTool<'a> {
    pub handler: Arc<dyn ToolHandler>,
    pub spec: Option<&'a ToolSpec>,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
    /// Registration order, used when declaring tools to the model.
    order: Vec<String>,
    default_tool: Option<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Builder Methods ====================

    /// Register a declared tool. Re-registering a name replaces it.
    pub fn register(mut self, spec: ToolSpec, handler: Arc<dyn ToolHandler>) -> Self {
        let name = spec.name.clone();
        self.insert(
            name,
            RegisteredTool {
                spec: Some(spec),
                handler,
            },
        );
        self
    }

    /// Register a handler without a declaration.
    ///
    /// The tool is callable but not offered to the model, and its arguments
    /// are not checked against a schema.
    pub fn register_handler(mut self, name: impl Into<String>, handler: Arc<dyn ToolHandler>) -> Self {
        self.insert(
            name.into(),
            RegisteredTool {
                spec: None,
                handler,
            },
        );
        self
    }

    /// Install the handler behind the reserved default tool.
    pub fn with_default_tool(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        self.default_tool = Some(RegisteredTool {
            spec: Some(database_search_spec()),
            handler,
        });
        self
    }

    fn insert(&mut self, name: String, tool: RegisteredTool) {
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    // ==================== Lookup ====================

    /// Resolve a tool name to its handler.
    pub fn resolve(&self, name: &str) -> Result<ResolvedTool<'_>, ToolError> {
        let tool = self
            .tools
            .get(name)
            .or_else(|| {
                (name == DATABASE_SEARCH_TOOL)
                    .then_some(self.default_tool.as_ref())
                    .flatten()
            })
            .ok_or_else(|| ToolError::unknown_tool(name))?;

        Ok(ResolvedTool {
            handler: Arc::clone(&tool.handler),
            spec: tool.spec.as_ref(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Declarations offered to the model, in registration order, followed
    /// by the default tool unless a registered tool shadows it.
    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self
            .order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .filter_map(|tool| tool.spec.clone())
            .collect();

        if !self.tools.contains_key(DATABASE_SEARCH_TOOL)
            && let Some(spec) = self.default_tool.as_ref().and_then(|t| t.spec.clone())
        {
            specs.push(spec);
        }
        specs
    }

    /// Names of every callable tool.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.order.iter().map(String::as_str).collect();
        if self.default_tool.is_some() && !self.tools.contains_key(DATABASE_SEARCH_TOOL) {
            names.push(DATABASE_SEARCH_TOOL);
        }
        names
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.default_tool.is_none()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
