// ABOUTME: Tool-call boundary — the persistence operations as named tools for an agent runtime.
// ABOUTME: Defines the Tool trait and a registry that lists definitions and dispatches calls.

pub mod study;

use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::session::StudyStore;

pub use study::{
    AppendDailyCheckinTool, LoadStudyStateTool, LogSessionEventTool, SaveStudyStateTool,
};

/// A callable operation exposed to the agent runtime.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema describing the `params` object.
    fn schema(&self) -> Value;

    /// Run the tool. `Err` means the call itself was malformed; storage
    /// failures come back as an `Ok` result with `status = "error"`.
    async fn execute(&self, params: Value) -> anyhow::Result<Value>;
}

/// Name, description, and parameter schema of a registered tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Tools in registration order.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the four study-state tools bound to `store`.
    pub fn study_tools(store: Arc<StudyStore>) -> Self {
        let mut registry = Self::new();
        registry.register(LoadStudyStateTool::new(store.clone()));
        registry.register(SaveStudyStateTool::new(store.clone()));
        registry.register(LogSessionEventTool::new(store.clone()));
        registry.register(AppendDailyCheckinTool::new(store));
        registry
    }

    /// Register a tool, replacing any existing tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let tool: Arc<dyn Tool> = Arc::new(tool);
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.schema(),
            })
            .collect()
    }

    /// Dispatch a call by tool name.
    pub async fn call(&self, name: &str, params: Value) -> anyhow::Result<Value> {
        let Some(tool) = self.get(name) else {
            bail!("unknown tool: {name}");
        };
        tool.execute(params)
            .await
            .with_context(|| format!("tool {name} failed"))
    }
}

/// Fetch a required string parameter.
pub(crate) fn string_param<'p>(params: &'p Value, key: &str) -> anyhow::Result<&'p str> {
    match params.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => bail!("parameter '{key}' must be a string, got {other}"),
        None => bail!("missing required parameter '{key}'"),
    }
}
