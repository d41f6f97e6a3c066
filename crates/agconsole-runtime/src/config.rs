use agconsole_types::{ProcessingMode, SessionAttributes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Bot used when nothing else selects one
pub const DEFAULT_BOT_NAME: &str = "Agent Assistant";

/// Environment variable naming the bot to use
pub const BOT_NAME_ENV: &str = "BOT_NAME";

/// Resolve the agconsole data directory path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. AGCONSOLE_PATH environment variable (with tilde expansion)
/// 3. XDG data directory
/// 4. ~/.agconsole
pub fn resolve_workspace_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("AGCONSOLE_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("agconsole"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".agconsole"));
    }

    Err(Error::Config(
        "Could not determine data path: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// One published alias of an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfig {
    pub agent_id: String,
    pub alias_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A named bot as written in the config file.
///
/// Agent ids may be left out; they are then looked up by `agent_name`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BotConfig {
    pub bot_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_alias_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
    #[serde(default)]
    pub processing_mode: ProcessingMode,
    /// Recorded event stream answering this bot's turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<SessionAttributes>,
}

impl BotConfig {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_bot: Option<String>,

    /// Agent id -> display name
    #[serde(default)]
    pub agents: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<AliasConfig>,

    #[serde(default)]
    pub bots: Vec<BotConfig>,

    /// Directory relative paths in the file are resolved against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let base_dir = path.parent().map(Path::to_path_buf);

        if !path.exists() {
            return Ok(Self {
                base_dir,
                ..Self::default()
            });
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.base_dir = base_dir;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_workspace_path(None)?.join("config.toml"))
    }

    pub fn bot(&self, bot_name: &str) -> Option<&BotConfig> {
        self.bots.iter().find(|bot| bot.bot_name == bot_name)
    }

    /// Add a bot, replacing any bot with the same name
    pub fn set_bot(&mut self, bot: BotConfig) {
        match self.bots.iter_mut().find(|b| b.bot_name == bot.bot_name) {
            Some(existing) => *existing = bot,
            None => self.bots.push(bot),
        }
    }

    /// Name of the bot to use: explicit choice, then `BOT_NAME`, then the
    /// configured default, then [`DEFAULT_BOT_NAME`].
    pub fn selected_bot_name(&self, explicit: Option<&str>) -> String {
        self.selected_bot_name_with_env(explicit, std::env::var(BOT_NAME_ENV).ok())
    }

    fn selected_bot_name_with_env(&self, explicit: Option<&str>, env: Option<String>) -> String {
        explicit
            .map(str::to_string)
            .or(env.filter(|name| !name.is_empty()))
            .or_else(|| self.default_bot.clone())
            .unwrap_or_else(|| DEFAULT_BOT_NAME.to_string())
    }

    pub fn select_bot(&self, explicit: Option<&str>) -> Result<&BotConfig> {
        let name = self.selected_bot_name(explicit);
        self.bot(&name)
            .ok_or_else(|| Error::Config(format!("Unknown bot '{}'", name)))
    }

    /// Resolve a path from the config file against the config directory
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_relative()
            && let Some(base) = &self.base_dir
        {
            return base.join(path);
        }
        path.to_path_buf()
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }
}
