use crate::agent::protocol::AgentError;
use crate::traits::{Tool, ToolName};
use std::collections::HashMap;
use std::sync::Arc;

/// Enumerated tool dispatch table.
///
/// Wire names only reach a tool after parsing into [`ToolName`]; anything the
/// model invents comes back as [`AgentError::UnknownTool`] instead of an open
/// string lookup.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<ToolName, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tools in advertised order, for prompt construction.
    pub fn descriptions(&self) -> Vec<(ToolName, String)> {
        let mut entries: Vec<(ToolName, String)> = self
            .tools
            .values()
            .map(|t| (t.name(), t.description().to_string()))
            .collect();
        entries.sort_by_key(|(name, _)| name.as_str());
        entries
    }

    pub async fn invoke(&self, name: &str, input: &str) -> Result<String, AgentError> {
        let tool = ToolName::parse(name)
            .and_then(|n| self.tools.get(&n))
            .ok_or_else(|| AgentError::UnknownTool(name.to_string()))?;

        Ok(tool.invoke(input).await)
    }
}
