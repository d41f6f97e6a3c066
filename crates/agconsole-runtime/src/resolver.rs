use agconsole_types::BotProfile;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::config::{AliasConfig, BotConfig, Config};
use crate::{Error, Result};

/// Published alias of an agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSummary {
    pub alias_id: String,
    pub updated_at: DateTime<Utc>,
}

/// Listing of the agents and aliases deployed in the agent service
pub trait AgentCatalog {
    fn find_agent_id(&self, agent_name: &str) -> Result<Option<String>>;
    fn list_aliases(&self, agent_id: &str) -> Result<Vec<AliasSummary>>;
}

/// Catalog served from the `[agents]` table and `[[aliases]]` list of the
/// config file
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    /// Agent id -> name
    agents: BTreeMap<String, String>,
    aliases: Vec<AliasConfig>,
}

impl StaticCatalog {
    pub fn new(agents: BTreeMap<String, String>, aliases: Vec<AliasConfig>) -> Self {
        Self { agents, aliases }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.agents.clone(), config.aliases.clone())
    }
}

impl AgentCatalog for StaticCatalog {
    fn find_agent_id(&self, agent_name: &str) -> Result<Option<String>> {
        Ok(self
            .agents
            .iter()
            .find(|(_, name)| name.as_str() == agent_name)
            .map(|(id, _)| id.clone()))
    }

    fn list_aliases(&self, agent_id: &str) -> Result<Vec<AliasSummary>> {
        Ok(self
            .aliases
            .iter()
            .filter(|alias| alias.agent_id == agent_id)
            .map(|alias| AliasSummary {
                alias_id: alias.alias_id.clone(),
                updated_at: alias.updated_at,
            })
            .collect())
    }
}

/// Most recently updated alias
pub fn latest_alias(aliases: &[AliasSummary]) -> Option<&AliasSummary> {
    aliases.iter().max_by_key(|alias| alias.updated_at)
}

/// Turns bot entries of the config file into invocation-ready profiles
pub struct BotProfileResolver<'a> {
    config: &'a Config,
    catalog: &'a dyn AgentCatalog,
}

impl<'a> BotProfileResolver<'a> {
    pub fn new(config: &'a Config, catalog: &'a dyn AgentCatalog) -> Self {
        Self { config, catalog }
    }

    /// Resolve one bot. Missing ids are looked up in the catalog; anything
    /// still missing is reported as incomplete configuration.
    pub fn resolve(&self, bot: &BotConfig) -> Result<BotProfile> {
        let agent_id = match non_empty(&bot.agent_id) {
            Some(id) => id,
            None => self.lookup_agent_id(bot)?,
        };

        let agent_alias_id = match non_empty(&bot.agent_alias_id) {
            Some(id) => id,
            None => self.lookup_alias_id(bot, &agent_id)?,
        };

        Ok(BotProfile {
            bot_name: bot.bot_name.clone(),
            agent_id,
            agent_alias_id,
            region: bot.region.clone(),
            session_attributes: bot.session_attributes.clone(),
            tasks: bot.tasks.as_deref().map(|p| self.config.resolve_path(p)),
            start_prompt: bot.start_prompt.clone(),
            additional_instructions: bot.additional_instructions.clone(),
            processing_mode: bot.processing_mode,
            inputs: bot.inputs.clone(),
        })
    }

    /// Resolve every configured bot, skipping (and logging) the ones that
    /// cannot be resolved
    pub fn resolve_all(&self) -> Vec<BotProfile> {
        self.config
            .bots
            .iter()
            .filter_map(|bot| match self.resolve(bot) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    tracing::warn!(bot = %bot.bot_name, "Skipping bot: {}", err);
                    None
                }
            })
            .collect()
    }

    fn lookup_agent_id(&self, bot: &BotConfig) -> Result<String> {
        let Some(agent_name) = non_empty(&bot.agent_name) else {
            return Err(Error::ConfigurationIncomplete(format!(
                "bot '{}' has no agent_id and no agent_name to look it up",
                bot.bot_name
            )));
        };

        self.catalog.find_agent_id(&agent_name)?.ok_or_else(|| {
            Error::ConfigurationIncomplete(format!(
                "bot '{}': no agent named '{}' found, agent_id is missing",
                bot.bot_name, agent_name
            ))
        })
    }

    fn lookup_alias_id(&self, bot: &BotConfig, agent_id: &str) -> Result<String> {
        let aliases = self.catalog.list_aliases(agent_id)?;
        latest_alias(&aliases)
            .map(|alias| alias.alias_id.clone())
            .ok_or_else(|| {
                Error::ConfigurationIncomplete(format!(
                    "bot '{}': agent '{}' has no alias, agent_alias_id is missing",
                    bot.bot_name, agent_id
                ))
            })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}
