//! Tool registry — lookup and dispatch by wire name.

use std::collections::HashMap;
use std::sync::Arc;

use super::types::{ClientTool, ToolOutcome};

/// Registry of the client tools offered to the remote agent.
///
/// Tools are registered with [`register()`](Self::register) and dispatched
/// by name with [`dispatch()`](Self::dispatch). Unknown names produce an
/// error outcome so the session keeps running.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ClientTool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn ClientTool>) {
        self.tools.insert(tool.name().to_owned(), tool);
    }

    /// Get a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn ClientTool>> {
        self.tools.get(name).cloned()
    }

    /// List registered tool names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Invoke the named tool with the given parameters.
    ///
    /// An unknown tool name is reported back to the agent as an error
    /// outcome, not raised.
    #[must_use]
    pub fn dispatch(&self, name: &str, params: &serde_json::Value) -> ToolOutcome {
        match self.get(name) {
            Some(tool) => tool.invoke(params),
            None => {
                tracing::warn!("agent requested unknown client tool: {name}");
                ToolOutcome::error(format!("unknown client tool: {name}"))
            }
        }
    }
}
