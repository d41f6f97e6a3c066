use agconsole_types::*;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;

use crate::schema::{
    ActionGroupInputRecord, CallerChainEntry, ChunkRecord, CodeInterpreterInputRecord,
    CodeInterpreterOutputRecord, CollaboratorInputRecord, CollaboratorOutputRecord,
    InvocationInputRecord, KnowledgeBaseLookupInputRecord, KnowledgeBaseLookupOutputRecord,
    ModelInvocationOutput, ObservationRecord, OrchestrationTrace, RawEvent, RawModelResponse,
    RoutingClassifierTrace, TextBody, TraceEnvelope, UsageMetadata,
};

/// Markup wrapper the routing classifier puts around its answer, e.g. `<a>name</a>`
static WRAPPER_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?a>").unwrap());

/// Turn state the classifier needs to interpret a frame
#[derive(Debug, Clone, Copy)]
pub struct ClassifierContext<'a> {
    /// Collaborator currently in charge (blank before the first switch)
    pub active_agent: &'a str,
    /// When the open routing phase started, if one is open
    pub routing_started_at: Option<DateTime<Utc>>,
    /// Arrival time of the frame being classified
    pub now: DateTime<Utc>,
}

/// Everything extracted from one raw frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    /// Recognized events in the order they appear within the frame
    pub events: Vec<StreamEvent>,
    /// Usage reported by the frame, if any model call was observed
    pub usage: Option<TokenUsage>,
    /// Routing decision, when the frame closed a routing phase
    pub routing: Option<RoutingDecision>,
    /// The frame answered the pending routing input, whether or not a
    /// decision could be read from it
    pub routing_closed: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Classified {
    fn degraded(&mut self, message: String) {
        tracing::warn!(target: "agconsole::trace", "{}", message);
        self.diagnostics.push(Diagnostic::degraded(message));
    }

    fn unknown(&mut self, message: String) {
        tracing::debug!(target: "agconsole::trace", "{}", message);
        self.diagnostics.push(Diagnostic::unknown(message));
    }

    /// Deserialize one leaf payload, recording a degraded diagnostic on failure
    fn parse<T: DeserializeOwned>(&mut self, value: &Value, what: &str) -> Option<T> {
        match serde_json::from_value::<T>(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                self.degraded(format!("Malformed {}: {}", what, err));
                None
            }
        }
    }
}

/// Classify one raw frame of the completion stream.
///
/// Never fails: malformed sub-fields degrade to diagnostics (and zero usage
/// where usage was expected) so that the rest of the stream is still read.
pub fn classify(raw: &RawEvent, ctx: &ClassifierContext<'_>) -> Classified {
    let mut out = Classified::default();

    if let Some(chunk) = &raw.chunk {
        classify_chunk(chunk, &mut out);
    }

    if let Some(trace) = &raw.trace {
        classify_trace(trace, ctx, &mut out);
    }

    if raw.chunk.is_none() && raw.trace.is_none() {
        out.unknown(format!(
            "Ignoring event with unrecognized shape: {:?}",
            raw.keys()
        ));
    }

    out
}

fn classify_chunk(chunk: &Value, out: &mut Classified) {
    if let Some(record) = out.parse::<ChunkRecord>(chunk, "chunk") {
        out.events.push(StreamEvent::TextChunk(TextChunkPayload {
            bytes: record.bytes.into_bytes(),
        }));
    }
}

fn classify_trace(trace: &Value, ctx: &ClassifierContext<'_>, out: &mut Classified) {
    let Some(envelope) = out.parse::<TraceEnvelope>(trace, "trace envelope") else {
        return;
    };

    let Some(inner) = &envelope.trace else {
        out.unknown("Ignoring trace event without inner trace".to_string());
        return;
    };

    let mut recognized = false;

    if let Some(routing) = &inner.routing_classifier_trace {
        recognized = true;
        classify_routing(routing, ctx, out);
    }

    if let Some(orchestration) = &inner.orchestration_trace {
        recognized = true;
        classify_orchestration(orchestration, &envelope, out);
    }

    if !recognized {
        let keys: Vec<&String> = inner.other.keys().collect();
        out.unknown(format!("Ignoring trace of unrecognized kind: {:?}", keys));
    }
}

fn classify_routing(
    routing: &RoutingClassifierTrace,
    ctx: &ClassifierContext<'_>,
    out: &mut Classified,
) {
    if routing.model_invocation_input.is_some() {
        out.events.push(StreamEvent::RoutingInput);
        return;
    }

    let Some(output) = &routing.model_invocation_output else {
        out.unknown("Ignoring routing trace without model invocation".to_string());
        return;
    };

    let Some(started_at) = ctx.routing_started_at else {
        tracing::debug!(
            target: "agconsole::trace",
            "Routing output without a pending routing input; ignored"
        );
        return;
    };
    out.routing_closed = true;

    let Some(output) = out.parse::<ModelInvocationOutput>(output, "routing model output") else {
        return;
    };

    let usage = extract_usage(output.metadata.as_ref(), "routing", out);
    out.usage = usage;

    let Some(classification) = extract_classification(&output, out) else {
        return;
    };

    let elapsed_seconds = (ctx.now - started_at)
        .to_std()
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);

    out.routing = Some(RoutingDecision::from_classification(
        classification.clone(),
        ctx.active_agent,
        elapsed_seconds,
    ));
    out.events.push(StreamEvent::RoutingOutput(RoutingOutputPayload {
        classification,
        usage,
    }));
}

/// Pull the classification token out of the JSON-encoded raw response
fn extract_classification(output: &ModelInvocationOutput, out: &mut Classified) -> Option<String> {
    let Some(content) = output.raw_response.as_ref().and_then(|r| r.content.as_ref()) else {
        out.degraded("Routing output has no rawResponse.content".to_string());
        return None;
    };

    let response: RawModelResponse = match serde_json::from_str(content) {
        Ok(response) => response,
        Err(err) => {
            out.degraded(format!("Routing rawResponse is not valid JSON: {}", err));
            return None;
        }
    };

    let Some(text) = response.content.first().and_then(|block| block.text.as_deref()) else {
        out.degraded("Routing rawResponse has no text content".to_string());
        return None;
    };

    Some(strip_wrapper_tags(text))
}

/// Remove `<a>`/`</a>` wrappers
pub fn strip_wrapper_tags(text: &str) -> String {
    WRAPPER_TAG_REGEX.replace_all(text, "").into_owned()
}

/// Read `metadata.usage`.
///
/// Absent metadata or usage means no model call was observed. Present but
/// malformed usage counts as a call with zero tokens.
fn extract_usage(metadata: Option<&Value>, origin: &str, out: &mut Classified) -> Option<TokenUsage> {
    let metadata = metadata?;

    let parsed = match serde_json::from_value::<UsageMetadata>(metadata.clone()) {
        Ok(parsed) => parsed,
        Err(err) => {
            out.degraded(format!("Malformed {} usage metadata: {}", origin, err));
            return Some(TokenUsage::new(0, 0));
        }
    };

    let usage = parsed.usage?;
    let usage = TokenUsage {
        input_tokens: usage.input_tokens,
        output_tokens: usage.output_tokens,
    };

    (!usage.is_empty()).then_some(usage)
}

fn classify_orchestration(
    orchestration: &OrchestrationTrace,
    envelope: &TraceEnvelope,
    out: &mut Classified,
) {
    let mut recognized = false;

    if let Some(input) = &orchestration.invocation_input {
        recognized = true;
        classify_invocation_input(input, out);
    }

    if let Some(output) = &orchestration.model_invocation_output {
        recognized = true;
        if let Some(output) = out.parse::<ModelInvocationOutput>(output, "orchestration model output")
        {
            let usage = extract_usage(output.metadata.as_ref(), "orchestration", out);
            if let Some(usage) = usage {
                out.usage = Some(usage);
                out.events.push(StreamEvent::OrchestrationModelOutput(usage));
            }
        } else {
            out.usage = Some(TokenUsage::new(0, 0));
        }
    }

    if let Some(rationale) = &orchestration.rationale {
        recognized = true;
        if let Some(body) = out.parse::<TextBody>(rationale, "rationale") {
            let caller_chain = extract_caller_chain(envelope.caller_chain.as_ref(), out);
            out.events.push(StreamEvent::OrchestrationRationale(RationalePayload {
                text: body.text,
                agent_id: envelope.agent_id.clone(),
                caller_chain,
            }));
        }
    }

    if let Some(observation) = &orchestration.observation {
        recognized = true;
        classify_observation(observation, out);
    }

    if !recognized {
        out.unknown("Ignoring orchestration trace without recognized parts".to_string());
    }
}

fn extract_caller_chain(chain: Option<&Value>, out: &mut Classified) -> Vec<String> {
    let Some(chain) = chain else {
        return Vec::new();
    };

    out.parse::<Vec<CallerChainEntry>>(chain, "callerChain")
        .unwrap_or_default()
        .into_iter()
        .map(|entry| entry.agent_alias_arn.unwrap_or_default())
        .collect()
}

fn classify_invocation_input(input: &Value, out: &mut Classified) {
    let Some(record) = out.parse::<InvocationInputRecord>(input, "invocationInput") else {
        return;
    };

    if let Some(value) = &record.knowledge_base_lookup_input
        && let Some(kb) =
            out.parse::<KnowledgeBaseLookupInputRecord>(value, "knowledgeBaseLookupInput")
    {
        out.events.push(StreamEvent::OrchestrationInput(
            InvocationInput::KnowledgeBaseLookup(KnowledgeBaseLookupInput {
                knowledge_base_id: kb.knowledge_base_id,
                text: kb.text,
            }),
        ));
    }

    if let Some(value) = &record.agent_collaborator_invocation_input
        && let Some(collab) =
            out.parse::<CollaboratorInputRecord>(value, "agentCollaboratorInvocationInput")
    {
        out.events.push(StreamEvent::OrchestrationInput(
            InvocationInput::AgentCollaborator(CollaboratorInvocationInput {
                collaborator_name: collab.agent_collaborator_name,
                input_text: collab.input.text,
            }),
        ));
    }

    if let Some(value) = &record.action_group_invocation_input
        && let Some(action) =
            out.parse::<ActionGroupInputRecord>(value, "actionGroupInvocationInput")
    {
        let parameters = action.parameters.map(|params| {
            params
                .iter()
                .map(|p| ToolParameter {
                    name: p.name.clone(),
                    value: p.value_text(),
                })
                .collect()
        });

        out.events.push(StreamEvent::OrchestrationInput(InvocationInput::ActionGroup(
            ActionGroupInvocationInput {
                function: action
                    .function
                    .unwrap_or_else(|| UNKNOWN_FUNCTION.to_string()),
                execution_type: action.execution_type,
                parameters,
            },
        )));
    }

    if let Some(value) = &record.code_interpreter_invocation_input
        && let Some(code) =
            out.parse::<CodeInterpreterInputRecord>(value, "codeInterpreterInvocationInput")
    {
        out.events.push(StreamEvent::OrchestrationInput(
            InvocationInput::CodeInterpreter(CodeInterpreterInvocationInput { code: code.code }),
        ));
    }
}

fn classify_observation(observation: &Value, out: &mut Classified) {
    let Some(record) = out.parse::<ObservationRecord>(observation, "observation") else {
        return;
    };

    if let Some(value) = &record.knowledge_base_lookup_output
        && let Some(kb) =
            out.parse::<KnowledgeBaseLookupOutputRecord>(value, "knowledgeBaseLookupOutput")
    {
        let references = kb
            .retrieved_references
            .into_iter()
            .map(|r| RetrievedReference {
                text: r.content.and_then(|c| c.text).unwrap_or_default(),
            })
            .collect();
        out.events.push(StreamEvent::OrchestrationObservation(
            Observation::KnowledgeBaseLookup(KnowledgeBaseLookupOutput { references }),
        ));
    }

    if let Some(value) = &record.agent_collaborator_invocation_output
        && let Some(collab) =
            out.parse::<CollaboratorOutputRecord>(value, "agentCollaboratorInvocationOutput")
    {
        out.events.push(StreamEvent::OrchestrationObservation(
            Observation::AgentCollaborator(CollaboratorInvocationOutput {
                collaborator_name: collab.agent_collaborator_name,
                text: collab.output.text,
            }),
        ));
    }

    if let Some(value) = &record.action_group_invocation_output
        && let Some(body) = out.parse::<TextBody>(value, "actionGroupInvocationOutput")
    {
        out.events.push(StreamEvent::OrchestrationObservation(
            Observation::ActionGroup(ActionGroupInvocationOutput { text: body.text }),
        ));
    }

    if let Some(value) = &record.code_interpreter_invocation_output
        && let Some(code) =
            out.parse::<CodeInterpreterOutputRecord>(value, "codeInterpreterInvocationOutput")
    {
        out.events.push(StreamEvent::OrchestrationObservation(
            Observation::CodeInterpreter(CodeInterpreterInvocationOutput {
                execution_output: code.execution_output,
                execution_error: code.execution_error,
                files: code.files,
            }),
        ));
    }

    if let Some(value) = &record.final_response
        && let Some(body) = out.parse::<TextBody>(value, "finalResponse")
    {
        out.events.push(StreamEvent::OrchestrationObservation(
            Observation::FinalResponse(FinalResponse { text: body.text }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn ctx(now: DateTime<Utc>) -> ClassifierContext<'static> {
        ClassifierContext {
            active_agent: " ",
            routing_started_at: None,
            now,
        }
    }

    fn raw(value: Value) -> RawEvent {
        RawEvent::from_value(value).unwrap()
    }

    fn routing_output(text: &str, usage: Value) -> RawEvent {
        let content = json!({"content": [{"text": text}]}).to_string();
        raw(json!({
            "trace": {
                "trace": {
                    "routingClassifierTrace": {
                        "modelInvocationOutput": {
                            "rawResponse": {"content": content},
                            "metadata": {"usage": usage}
                        }
                    }
                }
            }
        }))
    }

    #[test]
    fn test_chunk() {
        let out = classify(&raw(json!({"chunk": {"bytes": "Sure, "}})), &ctx(Utc::now()));
        assert_eq!(
            out.events,
            vec![StreamEvent::TextChunk(TextChunkPayload::new("Sure, "))]
        );
        assert!(out.usage.is_none());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_routing_input() {
        let event = raw(json!({
            "trace": {"trace": {"routingClassifierTrace": {"modelInvocationInput": {"text": "..."}}}}
        }));
        let out = classify(&event, &ctx(Utc::now()));
        assert_eq!(out.events, vec![StreamEvent::RoutingInput]);
    }

    #[test]
    fn test_routing_output_switches_collaborator() {
        let now = Utc::now();
        let context = ClassifierContext {
            active_agent: " ",
            routing_started_at: Some(now - Duration::milliseconds(1500)),
            now,
        };

        let event = routing_output("<a>restaurant-agent</a>", json!({"inputTokens": 120, "outputTokens": 8}));
        let out = classify(&event, &context);

        let decision = out.routing.expect("routing decision");
        assert_eq!(decision.classification, "restaurant-agent");
        assert_eq!(decision.outcome, RoutingOutcome::Switch);
        assert!((decision.elapsed_seconds - 1.5).abs() < 1e-6);
        assert_eq!(out.usage, Some(TokenUsage::new(120, 8)));
    }

    #[test]
    fn test_routing_output_without_pending_input_is_ignored() {
        let event = routing_output("<a>undecidable</a>", json!({"inputTokens": 1, "outputTokens": 1}));
        let out = classify(&event, &ctx(Utc::now()));
        assert!(out.events.is_empty());
        assert!(out.routing.is_none());
        assert!(out.usage.is_none());
    }

    #[test]
    fn test_routing_output_with_broken_raw_response_keeps_usage() {
        let now = Utc::now();
        let context = ClassifierContext {
            active_agent: " ",
            routing_started_at: Some(now),
            now,
        };
        let event = raw(json!({
            "trace": {"trace": {"routingClassifierTrace": {"modelInvocationOutput": {
                "rawResponse": {"content": "not json"},
                "metadata": {"usage": {"inputTokens": 10, "outputTokens": 2}}
            }}}}
        }));

        let out = classify(&event, &context);
        assert!(out.routing.is_none());
        assert!(out.routing_closed);
        assert_eq!(out.usage, Some(TokenUsage::new(10, 2)));
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::TraceParseDegraded);
    }

    #[test]
    fn test_strip_wrapper_tags() {
        assert_eq!(strip_wrapper_tags("<a>keep_previous_agent</a>"), "keep_previous_agent");
        assert_eq!(strip_wrapper_tags(" <a>x</a>\n"), " x\n");
        assert_eq!(strip_wrapper_tags("plain"), "plain");
    }

    #[test]
    fn test_malformed_usage_degrades_to_zero() {
        let event = raw(json!({
            "trace": {"trace": {"orchestrationTrace": {"modelInvocationOutput": {
                "metadata": {"usage": {"inputTokens": "many"}}
            }}}}
        }));
        let out = classify(&event, &ctx(Utc::now()));
        assert_eq!(out.usage, Some(TokenUsage::new(0, 0)));
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::TraceParseDegraded);
    }

    #[test]
    fn test_missing_usage_is_not_a_call() {
        let event = raw(json!({
            "trace": {"trace": {"orchestrationTrace": {"modelInvocationOutput": {"metadata": {}}}}}
        }));
        let out = classify(&event, &ctx(Utc::now()));
        assert!(out.usage.is_none());
        assert!(out.events.is_empty());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_top_level_shape() {
        let out = classify(&raw(json!({"files": {"files": []}})), &ctx(Utc::now()));
        assert!(out.events.is_empty());
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::UnknownEventShape);
    }

    #[test]
    fn test_unknown_trace_kind() {
        let event = raw(json!({"trace": {"trace": {"preProcessingTrace": {}}}}));
        let out = classify(&event, &ctx(Utc::now()));
        assert!(out.events.is_empty());
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::UnknownEventShape);
        assert!(out.diagnostics[0].message.contains("preProcessingTrace"));
    }
}
