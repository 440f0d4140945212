use super::runtime::RuntimeAgent;
use std::collections::HashMap;
use std::sync::Arc;

/// Agents assembled during one session, keyed by agent name.
///
/// Owned by whoever drives the session and dropped with it, so clients built
/// from one caller's credentials are never shared with another.
#[derive(Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn RuntimeAgent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn RuntimeAgent>> {
        self.agents.get(name).cloned()
    }

    pub fn insert(&mut self, agent: Arc<dyn RuntimeAgent>) -> Option<Arc<dyn RuntimeAgent>> {
        self.agents.insert(agent.name().to_string(), agent)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn RuntimeAgent>> {
        self.agents.remove(name)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
