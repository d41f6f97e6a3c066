use std::collections::BTreeMap;

/// Maps agent ids seen in rationale traces to display names
pub trait AgentDirectory {
    fn name_for(&self, agent_id: &str) -> Option<String>;
}

/// Directory that knows no agents; labels fall back to raw ids
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirectory;

impl AgentDirectory for NoDirectory {
    fn name_for(&self, _agent_id: &str) -> Option<String> {
        None
    }
}

impl AgentDirectory for BTreeMap<String, String> {
    fn name_for(&self, agent_id: &str) -> Option<String> {
        self.get(agent_id).cloned()
    }
}
