use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Error;

/// How composed task prompts ask the agent to schedule tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    #[default]
    Sequential,
    AllowParallel,
}

impl ProcessingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Sequential => "sequential",
            ProcessingMode::AllowParallel => "allow_parallel",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(ProcessingMode::Sequential),
            "allow_parallel" => Ok(ProcessingMode::AllowParallel),
            other => Err(Error::InvalidValue {
                field: "processing_mode",
                value: other.to_string(),
            }),
        }
    }
}

/// Attributes forwarded to the agent as session state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionAttributes {
    #[serde(default)]
    pub session_attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_session_attributes: Option<BTreeMap<String, String>>,
}

/// Fully resolved bot configuration.
///
/// Read-only for the duration of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotProfile {
    pub bot_name: String,
    pub agent_id: String,
    pub agent_alias_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<SessionAttributes>,
    /// Path to a declarative task list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
    #[serde(default)]
    pub processing_mode: ProcessingMode,
    /// Values substituted into task templates
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_mode_parse() {
        assert_eq!(
            "allow_parallel".parse::<ProcessingMode>().unwrap(),
            ProcessingMode::AllowParallel
        );
        assert_eq!(
            "sequential".parse::<ProcessingMode>().unwrap(),
            ProcessingMode::Sequential
        );
        let err = "whenever".parse::<ProcessingMode>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for processing_mode: 'whenever'");
    }
}
