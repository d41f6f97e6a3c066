use agconsole_providers::{ClassifierContext, RawEvent, classify};
use agconsole_types::{
    Diagnostic, DiagnosticKind, Observation, RationalePayload, StepRecord, StepNumber,
    StreamEvent, UsageTotals,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::assembler::ResponseStreamAssembler;
use crate::directory::{AgentDirectory, NoDirectory};
use crate::step_tracker::StepTracker;
use crate::token_accountant::TokenAccountant;
use crate::trace::TraceUpdate;

/// Output of feeding one frame (or the end of the stream) to the interpreter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    /// Text to show the user, in order
    pub fragments: Vec<String>,
    /// Trace updates, in order
    pub updates: Vec<TraceUpdate>,
}

impl Interpretation {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty() && self.updates.is_empty()
    }
}

/// Turn-scoped interpreter state: classifies each raw frame and threads the
/// result through the step tracker, token accountant and answer assembler.
///
/// Create one per turn; nothing carries over between turns.
pub struct TurnInterpreter {
    directory: Arc<dyn AgentDirectory + Send + Sync>,
    tracker: StepTracker,
    accountant: TokenAccountant,
    assembler: ResponseStreamAssembler,
    routing_started_at: Option<DateTime<Utc>>,
}

impl Default for TurnInterpreter {
    fn default() -> Self {
        Self::new(Arc::new(NoDirectory))
    }
}

impl TurnInterpreter {
    pub fn new(directory: Arc<dyn AgentDirectory + Send + Sync>) -> Self {
        Self {
            directory,
            tracker: StepTracker::new(),
            accountant: TokenAccountant::new(),
            assembler: ResponseStreamAssembler::new(),
            routing_started_at: None,
        }
    }

    pub fn current_step(&self) -> StepNumber {
        self.tracker.current_step()
    }

    pub fn active_agent(&self) -> &str {
        self.tracker.active_agent()
    }

    pub fn usage(&self) -> UsageTotals {
        self.accountant.snapshot()
    }

    pub fn step_trace(&self) -> &[StepRecord] {
        self.tracker.history()
    }

    /// Interpret one raw frame that arrived at `now`
    pub fn apply(&mut self, raw: &RawEvent, now: DateTime<Utc>) -> Interpretation {
        let ctx = ClassifierContext {
            active_agent: self.tracker.active_agent(),
            routing_started_at: self.routing_started_at,
            now,
        };
        let mut classified = classify(raw, &ctx);
        let mut out = Interpretation::default();

        for diagnostic in classified.diagnostics.drain(..) {
            if diagnostic.kind == DiagnosticKind::TraceParseDegraded {
                out.updates.push(TraceUpdate::Degraded(diagnostic));
            }
        }

        if let Some(usage) = &classified.usage {
            self.accountant.add_usage(usage);
        }

        if classified.routing_closed {
            self.routing_started_at = None;
        }

        for event in classified.events {
            match event {
                StreamEvent::TextChunk(chunk) => {
                    if let Some(fragment) = self.assembler.on_text_chunk(&chunk.text()) {
                        out.fragments.push(fragment);
                    }
                }
                StreamEvent::RoutingInput => {
                    self.routing_started_at = Some(now);
                    out.updates.push(TraceUpdate::RoutingStarted);
                }
                StreamEvent::RoutingOutput(_) => {
                    if let Some(decision) = classified.routing.take() {
                        self.tracker.on_routing_decision(&decision);
                        out.updates.push(TraceUpdate::RoutingResolved {
                            decision,
                            step: self.tracker.current_step(),
                        });
                    }
                }
                StreamEvent::OrchestrationInput(input) => {
                    out.updates.push(TraceUpdate::Invocation(input));
                }
                StreamEvent::OrchestrationModelOutput(_) => {}
                StreamEvent::OrchestrationRationale(rationale) => {
                    self.apply_rationale(rationale, &mut out);
                }
                StreamEvent::OrchestrationObservation(observation) => {
                    if let Observation::AgentCollaborator(output) = &observation {
                        self.assembler.on_collaborator_output(&output.text);
                    }
                    out.updates.push(TraceUpdate::Observation(observation));
                }
            }
        }

        out
    }

    fn apply_rationale(&mut self, rationale: RationalePayload, out: &mut Interpretation) {
        let Some(agent_id) = rationale.agent_id.as_deref() else {
            let message = "Rationale without agentId; step not advanced".to_string();
            tracing::warn!(target: "agconsole::trace", "{}", message);
            out.updates
                .push(TraceUpdate::Degraded(Diagnostic::degraded(message)));
            return;
        };

        let agent_name = self
            .directory
            .name_for(agent_id)
            .unwrap_or_else(|| agent_id.to_string());

        let record = self
            .tracker
            .on_rationale(rationale.caller_chain.len(), &agent_name);

        out.updates.push(TraceUpdate::Step {
            record,
            rationale: rationale.text,
        });
    }

    /// Close the turn: flush the collaborator answer and report totals
    pub fn finish(&mut self) -> Interpretation {
        if self.routing_started_at.take().is_some() {
            tracing::debug!(
                target: "agconsole::trace",
                "Routing input never answered before end of stream"
            );
        }

        let mut out = Interpretation::default();
        if let Some(fragment) = self.assembler.finish() {
            out.fragments.push(fragment);
        }
        out.updates.push(TraceUpdate::Finished(self.accountant.snapshot()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::collections::BTreeMap;

    fn raw(value: Value) -> RawEvent {
        RawEvent::from_value(value).unwrap()
    }

    fn rationale(agent_id: Option<&str>, chain_len: usize) -> RawEvent {
        let chain: Vec<Value> = (0..chain_len)
            .map(|i| json!({"agentAliasArn": format!("arn:alias/{}", i)}))
            .collect();
        let mut trace = json!({
            "callerChain": chain,
            "trace": {"orchestrationTrace": {"rationale": {"text": "thinking"}}}
        });
        if let Some(id) = agent_id {
            trace["agentId"] = json!(id);
        }
        raw(json!({"trace": trace}))
    }

    #[test]
    fn test_rationale_uses_directory_name() {
        let mut names = BTreeMap::new();
        names.insert("AGENT1".to_string(), "restaurant-agent".to_string());
        let mut interp = TurnInterpreter::new(Arc::new(names));

        let out = interp.apply(&rationale(Some("AGENT1"), 2), Utc::now());
        match &out.updates[..] {
            [TraceUpdate::Step { record, rationale }] => {
                assert_eq!(record.agent_name, "restaurant-agent");
                assert!(record.is_sub_agent);
                assert_eq!(rationale, "thinking");
            }
            other => panic!("unexpected updates: {:?}", other),
        }
    }

    #[test]
    fn test_rationale_falls_back_to_raw_id() {
        let mut interp = TurnInterpreter::default();
        interp.apply(&rationale(Some("AGENT9"), 1), Utc::now());
        assert_eq!(interp.step_trace()[0].agent_name, "AGENT9");
        assert_eq!(interp.current_step(), StepNumber::new(1, 0));
    }

    #[test]
    fn test_rationale_without_agent_id_is_degraded() {
        let mut interp = TurnInterpreter::default();
        let out = interp.apply(&rationale(None, 1), Utc::now());

        assert_eq!(interp.current_step(), StepNumber::ZERO);
        assert!(interp.step_trace().is_empty());
        assert!(matches!(&out.updates[..], [TraceUpdate::Degraded(_)]));
    }

    #[test]
    fn test_unknown_shapes_are_silent() {
        let mut interp = TurnInterpreter::default();
        let out = interp.apply(&raw(json!({"returnControl": {}})), Utc::now());
        assert!(out.is_empty());
    }

    #[test]
    fn test_finish_reports_totals_once() {
        let mut interp = TurnInterpreter::default();
        let out = interp.finish();
        assert_eq!(
            out.updates,
            vec![TraceUpdate::Finished(UsageTotals::default())]
        );
        assert!(out.fragments.is_empty());
    }
}
