use agconsole_engine::AgentDirectory;
use std::collections::BTreeMap;

use crate::config::Config;

/// Agent display names taken from the `[agents]` table of the config file
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    names: BTreeMap<String, String>,
}

impl StaticDirectory {
    pub fn new(names: BTreeMap<String, String>) -> Self {
        Self { names }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.agents.clone())
    }
}

impl AgentDirectory for StaticDirectory {
    fn name_for(&self, agent_id: &str) -> Option<String> {
        self.names.get(agent_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_ids() {
        let dir = StaticDirectory::new(BTreeMap::from([(
            "AGENT1".to_string(),
            "restaurant-agent".to_string(),
        )]));
        assert_eq!(dir.name_for("AGENT1").as_deref(), Some("restaurant-agent"));
        assert_eq!(dir.name_for("AGENT2"), None);
    }
}
