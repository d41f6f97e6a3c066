use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::usage::TokenUsage;

/// Label used when an action-group invocation does not name its function
pub const UNKNOWN_FUNCTION: &str = "Unknown function";

/// One classified event of an agent-invocation stream.
///
/// Events are produced by the classifier in arrival order and consumed
/// exactly once. A single raw orchestration record may yield several of
/// these (e.g. an invocation input together with model usage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
#[serde(rename_all = "snake_case")]
pub enum StreamEvent {
    /// 1. Raw answer text streamed by the agent
    TextChunk(TextChunkPayload),

    /// 2. The routing classifier was invoked (opens the routing phase)
    RoutingInput,

    /// 3. The routing classifier answered
    RoutingOutput(RoutingOutputPayload),

    /// 4. The orchestrator invoked a knowledge base, collaborator, tool or code interpreter
    OrchestrationInput(InvocationInput),

    /// 5. Usage metadata of an orchestration model call
    OrchestrationModelOutput(TokenUsage),

    /// 6. Reasoning text of the supervisor or of a nested collaborator
    OrchestrationRationale(RationalePayload),

    /// 7. Result of an invocation, or the agent's final response
    OrchestrationObservation(Observation),
}

impl StreamEvent {
    /// Short category name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::TextChunk(_) => "text_chunk",
            StreamEvent::RoutingInput => "routing_input",
            StreamEvent::RoutingOutput(_) => "routing_output",
            StreamEvent::OrchestrationInput(input) => input.kind(),
            StreamEvent::OrchestrationModelOutput(_) => "model_output",
            StreamEvent::OrchestrationRationale(_) => "rationale",
            StreamEvent::OrchestrationObservation(obs) => obs.kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunkPayload {
    /// Undecoded chunk bytes as delivered by the transport
    pub bytes: Vec<u8>,
}

impl TextChunkPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            bytes: text.into().into_bytes(),
        }
    }

    /// Chunk text, with invalid UTF-8 sequences replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingOutputPayload {
    /// Classification token with markup wrapper tags stripped
    pub classification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvocationInput {
    KnowledgeBaseLookup(KnowledgeBaseLookupInput),
    AgentCollaborator(CollaboratorInvocationInput),
    ActionGroup(ActionGroupInvocationInput),
    CodeInterpreter(CodeInterpreterInvocationInput),
}

impl InvocationInput {
    pub fn kind(&self) -> &'static str {
        match self {
            InvocationInput::KnowledgeBaseLookup(_) => "knowledge_base_lookup_input",
            InvocationInput::AgentCollaborator(_) => "agent_collaborator_invocation_input",
            InvocationInput::ActionGroup(_) => "action_group_invocation_input",
            InvocationInput::CodeInterpreter(_) => "code_interpreter_invocation_input",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseLookupInput {
    pub knowledge_base_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorInvocationInput {
    pub collaborator_name: String,
    pub input_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionGroupInvocationInput {
    /// Function name, or [`UNKNOWN_FUNCTION`]
    pub function: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_type: Option<String>,
    /// Parameters in the order the service listed them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ToolParameter>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeInterpreterInvocationInput {
    /// Source code, verbatim
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RationalePayload {
    pub text: String,
    /// Agent that produced the rationale; absent on some frames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    /// Alias ARNs from the outermost supervisor down to the emitting agent
    #[serde(default)]
    pub caller_chain: Vec<String>,
}

impl RationalePayload {
    /// A chain of one (or none) means the top-level supervisor is reasoning
    pub fn is_nested(&self) -> bool {
        self.caller_chain.len() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    KnowledgeBaseLookup(KnowledgeBaseLookupOutput),
    AgentCollaborator(CollaboratorInvocationOutput),
    ActionGroup(ActionGroupInvocationOutput),
    CodeInterpreter(CodeInterpreterInvocationOutput),
    FinalResponse(FinalResponse),
}

impl Observation {
    pub fn kind(&self) -> &'static str {
        match self {
            Observation::KnowledgeBaseLookup(_) => "knowledge_base_lookup_output",
            Observation::AgentCollaborator(_) => "agent_collaborator_invocation_output",
            Observation::ActionGroup(_) => "action_group_invocation_output",
            Observation::CodeInterpreter(_) => "code_interpreter_invocation_output",
            Observation::FinalResponse(_) => "final_response",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseLookupOutput {
    pub references: Vec<RetrievedReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedReference {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorInvocationOutput {
    pub collaborator_name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionGroupInvocationOutput {
    pub text: String,
}

/// Code interpreter result. Every field is independently optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeInterpreterInvocationOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResponse {
    pub text: String,
}
