//! Serde mirror of the agent-invocation event stream.
//!
//! The envelope levels keep their children as raw [`Value`]s so that each
//! leaf payload is deserialized on its own; a malformed leaf then degrades
//! only that part of the frame.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One record of the completion stream.
///
/// A record carries a `chunk`, a `trace`, or some other key the console
/// does not interpret (e.g. `returnControl`, `files`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Value>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl RawEvent {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Top-level keys, for diagnostics
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if self.chunk.is_some() {
            keys.push("chunk".to_string());
        }
        if self.trace.is_some() {
            keys.push("trace".to_string());
        }
        keys.extend(self.other.keys().cloned());
        keys
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChunkRecord {
    pub bytes: ChunkBytes,
}

/// Chunk bytes arrive either as text or as a raw byte array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ChunkBytes {
    Text(String),
    Raw(Vec<u8>),
}

impl ChunkBytes {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ChunkBytes::Text(text) => text.into_bytes(),
            ChunkBytes::Raw(bytes) => bytes,
        }
    }
}

/// `trace` envelope: identity of the emitting agent plus the inner trace
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TraceEnvelope {
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub caller_chain: Option<Value>,
    #[serde(default)]
    pub trace: Option<InnerTrace>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CallerChainEntry {
    #[serde(default)]
    pub agent_alias_arn: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InnerTrace {
    #[serde(default)]
    pub routing_classifier_trace: Option<RoutingClassifierTrace>,
    #[serde(default)]
    pub orchestration_trace: Option<OrchestrationTrace>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoutingClassifierTrace {
    #[serde(default, deserialize_with = "present")]
    pub model_invocation_input: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub model_invocation_output: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrchestrationTrace {
    #[serde(default, deserialize_with = "present")]
    pub invocation_input: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub model_invocation_output: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub rationale: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub observation: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModelInvocationOutput {
    #[serde(default)]
    pub raw_response: Option<RawResponse>,
    #[serde(default, deserialize_with = "present")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawResponse {
    /// JSON-encoded model response
    #[serde(default)]
    pub content: Option<String>,
}

/// Decoded `rawResponse.content` of the routing classifier
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawModelResponse {
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentBlock {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UsageMetadata {
    #[serde(default)]
    pub usage: Option<UsageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UsageRecord {
    #[serde(default)]
    pub input_tokens: Option<u32>,
    #[serde(default)]
    pub output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InvocationInputRecord {
    #[serde(default, deserialize_with = "present")]
    pub knowledge_base_lookup_input: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub agent_collaborator_invocation_input: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub action_group_invocation_input: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub code_interpreter_invocation_input: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KnowledgeBaseLookupInputRecord {
    pub knowledge_base_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollaboratorInputRecord {
    pub agent_collaborator_name: String,
    pub input: TextBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActionGroupInputRecord {
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub execution_type: Option<String>,
    #[serde(default)]
    pub parameters: Option<Vec<ParameterRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ParameterRecord {
    pub name: String,
    pub value: Value,
}

impl ParameterRecord {
    /// Parameter value as display text; JSON strings are unquoted
    pub fn value_text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CodeInterpreterInputRecord {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TextBody {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ObservationRecord {
    #[serde(default, deserialize_with = "present")]
    pub knowledge_base_lookup_output: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub agent_collaborator_invocation_output: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub action_group_invocation_output: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub code_interpreter_invocation_output: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub final_response: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KnowledgeBaseLookupOutputRecord {
    pub retrieved_references: Vec<RetrievedReferenceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RetrievedReferenceRecord {
    #[serde(default)]
    pub content: Option<ReferenceContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReferenceContent {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollaboratorOutputRecord {
    pub agent_collaborator_name: String,
    pub output: TextBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CodeInterpreterOutputRecord {
    #[serde(default)]
    pub execution_output: Option<String>,
    #[serde(default)]
    pub execution_error: Option<String>,
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

/// Keeps an explicit JSON `null` as `Some(Value::Null)`, so "key present"
/// stays distinguishable from "key absent".
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_event_keeps_unknown_keys() {
        let event = RawEvent::from_value(json!({"returnControl": {"invocationId": "x"}})).unwrap();
        assert!(event.chunk.is_none());
        assert!(event.trace.is_none());
        assert_eq!(event.keys(), vec!["returnControl".to_string()]);
    }

    #[test]
    fn test_chunk_bytes_text_or_array() {
        let text: ChunkRecord = serde_json::from_value(json!({"bytes": "hi"})).unwrap();
        assert_eq!(text.bytes.into_bytes(), b"hi".to_vec());

        let raw: ChunkRecord = serde_json::from_value(json!({"bytes": [104, 105]})).unwrap();
        assert_eq!(raw.bytes.into_bytes(), b"hi".to_vec());
    }

    #[test]
    fn test_present_distinguishes_null_from_absent() {
        let trace: OrchestrationTrace =
            serde_json::from_value(json!({"rationale": null})).unwrap();
        assert_eq!(trace.rationale, Some(Value::Null));
        assert!(trace.observation.is_none());
    }

    #[test]
    fn test_parameter_value_text() {
        let param: ParameterRecord =
            serde_json::from_value(json!({"name": "guests", "value": 2})).unwrap();
        assert_eq!(param.value_text(), "2");

        let param: ParameterRecord =
            serde_json::from_value(json!({"name": "time", "value": "7pm"})).unwrap();
        assert_eq!(param.value_text(), "7pm");
    }
}
