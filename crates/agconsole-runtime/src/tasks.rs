use agconsole_engine::TaskPromptBuilder;
use agconsole_types::BotProfile;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::{Error, Result};

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    #[serde(default)]
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

impl TaskDefinition {
    /// Task text with `{key}` placeholders filled from `inputs`
    pub fn render(&self, inputs: &BTreeMap<String, String>) -> String {
        let mut text = substitute(&self.description, inputs);
        if let Some(expected) = &self.expected_output {
            text.push_str(" Expected output: ");
            text.push_str(&substitute(expected, inputs));
        }
        text
    }
}

/// Declarative task list, stored as TOML `[[tasks]]` entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFile {
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
}

impl TaskFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read task file {}: {}", path.display(), e))
        })?;
        let file: TaskFile = toml::from_str(&content)?;
        Ok(file)
    }

    pub fn render(&self, inputs: &BTreeMap<String, String>) -> Vec<String> {
        self.tasks.iter().map(|task| task.render(inputs)).collect()
    }
}

/// Unknown placeholders are kept verbatim
fn substitute(template: &str, inputs: &BTreeMap<String, String>) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| match inputs.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Text sent to the agent for one turn.
///
/// A bot with a task list sends the composed task prompt; otherwise the
/// user's utterance goes out unchanged.
pub fn compose_input(profile: &BotProfile, utterance: &str) -> Result<String> {
    let Some(path) = &profile.tasks else {
        return Ok(utterance.to_string());
    };

    let tasks = TaskFile::load(path)?.render(&profile.inputs);
    tracing::debug!(
        bot = %profile.bot_name,
        tasks = tasks.len(),
        mode = %profile.processing_mode,
        "Composing task prompt"
    );

    Ok(TaskPromptBuilder::new(profile.processing_mode)
        .with_additional_instructions(profile.additional_instructions.clone())
        .build(&tasks))
}
