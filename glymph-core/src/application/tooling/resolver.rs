use super::http::{HttpTool, Tool};
use crate::domain::ToolConfig;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

/// Tools bound to one agent. Lookup prefers an exact name and falls back to
/// a case-insensitive match only when that match is unique.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let name = name.trim();
        if let Some(tool) = self.tools.iter().find(|tool| tool.name() == name) {
            return Some(tool.clone());
        }
        let mut folded = self
            .tools
            .iter()
            .filter(|tool| tool.name().eq_ignore_ascii_case(name));
        match (folded.next(), folded.next()) {
            (Some(tool), None) => Some(tool.clone()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Bind every active descriptor to an HTTP tool sharing `http`. Inactive
/// descriptors are dropped even if the caller already filtered them.
pub fn resolve_tools(descriptors: &[ToolConfig], http: &Client) -> ToolSet {
    let tools: Vec<Arc<dyn Tool>> = descriptors
        .iter()
        .filter(|descriptor| descriptor.is_active)
        .map(|descriptor| Arc::new(HttpTool::new(descriptor.clone(), http.clone())) as Arc<dyn Tool>)
        .collect();
    debug!(
        requested = descriptors.len(),
        bound = tools.len(),
        "Resolved agent tools"
    );
    ToolSet::new(tools)
}
