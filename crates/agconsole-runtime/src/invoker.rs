use agconsole_providers::{RawEvent, read_recording};
use agconsole_types::BotProfile;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{Error, Result};

/// Pull sequence of raw event records for one invocation
pub type EventStream = Box<dyn Iterator<Item = Result<RawEvent>>>;

/// Session state forwarded with an invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub session_attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_session_attributes: Option<BTreeMap<String, String>>,
}

/// Parameters of one agent-invocation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    pub agent_id: String,
    pub agent_alias_id: String,
    pub session_id: String,
    pub input_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_state: Option<SessionState>,
    pub enable_trace: bool,
}

impl InvocationRequest {
    pub fn new(profile: &BotProfile, session_id: &str, input_text: impl Into<String>) -> Self {
        let session_state = profile.session_attributes.as_ref().map(|attrs| SessionState {
            session_attributes: attrs.session_attributes.clone(),
            prompt_session_attributes: attrs.prompt_session_attributes.clone(),
        });

        Self {
            agent_id: profile.agent_id.clone(),
            agent_alias_id: profile.agent_alias_id.clone(),
            session_id: session_id.to_string(),
            input_text: input_text.into(),
            session_state,
            enable_trace: true,
        }
    }
}

/// Remote agent-invocation service
pub trait AgentInvoker {
    fn invoke(&self, request: &InvocationRequest) -> Result<EventStream>;
}

/// Answers every invocation by replaying a JSONL recording of raw events
#[derive(Debug, Clone)]
pub struct ReplayInvoker {
    path: PathBuf,
}

impl ReplayInvoker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl AgentInvoker for ReplayInvoker {
    fn invoke(&self, request: &InvocationRequest) -> Result<EventStream> {
        tracing::debug!(
            recording = %self.path.display(),
            session_id = %request.session_id,
            "Replaying recorded invocation"
        );

        let reader = read_recording(&self.path).map_err(|e| {
            Error::RemoteInvocation(format!(
                "Cannot open recording {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Box::new(reader.map(|item| item.map_err(Error::from))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agconsole_types::{ProcessingMode, SessionAttributes};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn profile(session_attributes: Option<SessionAttributes>) -> BotProfile {
        BotProfile {
            bot_name: "bot".to_string(),
            agent_id: "AGENT".to_string(),
            agent_alias_id: "ALIAS".to_string(),
            region: None,
            session_attributes,
            tasks: None,
            start_prompt: None,
            additional_instructions: None,
            processing_mode: ProcessingMode::Sequential,
            inputs: BTreeMap::new(),
        }
    }

    #[test]
    fn test_request_without_session_state() {
        let request = InvocationRequest::new(&profile(None), "s-1", "hello");
        assert!(request.enable_trace);
        assert!(request.session_state.is_none());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["agentAliasId"], "ALIAS");
        assert_eq!(json["enableTrace"], true);
        assert!(json.get("sessionState").is_none());
    }

    #[test]
    fn test_prompt_attributes_only_when_configured() {
        let attrs = SessionAttributes {
            session_attributes: BTreeMap::from([("k".to_string(), "v".to_string())]),
            prompt_session_attributes: None,
        };
        let request = InvocationRequest::new(&profile(Some(attrs)), "s-1", "hello");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["sessionState"]["sessionAttributes"]["k"], "v");
        assert!(json["sessionState"].get("promptSessionAttributes").is_none());
    }

    #[test]
    fn test_replay_reads_lazily() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"chunk":{{"bytes":"Hi"}}}}"#).unwrap();
        writeln!(file, "garbage").unwrap();

        let invoker = ReplayInvoker::new(file.path());
        let request = InvocationRequest::new(&profile(None), "s-1", "hello");
        let mut stream = invoker.invoke(&request).unwrap();

        assert!(stream.next().unwrap().is_ok());
        assert!(matches!(stream.next().unwrap(), Err(Error::Provider(_))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_missing_recording_is_remote_failure() {
        let invoker = ReplayInvoker::new("/no/such/recording.jsonl");
        let request = InvocationRequest::new(&profile(None), "s-1", "hello");
        assert!(matches!(
            invoker.invoke(&request),
            Err(Error::RemoteInvocation(_))
        ));
    }
}
