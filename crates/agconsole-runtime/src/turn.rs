use agconsole_engine::{AgentDirectory, Interpretation, TurnInterpreter};
use agconsole_types::{BotProfile, Turn, UsageTotals};
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::invoker::{AgentInvoker, EventStream, InvocationRequest};
use crate::observer::TraceObserver;
use crate::tasks::compose_input;
use crate::{Error, Result};

/// Run one turn against the agent of `profile`.
///
/// Fails before any remote call when the profile lacks agent ids. The
/// returned stream yields answer fragments lazily as events arrive.
pub fn invoke<'o>(
    invoker: &dyn AgentInvoker,
    profile: &BotProfile,
    session_id: &str,
    input_text: &str,
    directory: Arc<dyn AgentDirectory + Send + Sync>,
) -> Result<TurnStream<'o>> {
    check_profile(profile)?;

    let request = InvocationRequest::new(profile, session_id, compose_input(profile, input_text)?);
    tracing::info!(
        bot = %profile.bot_name,
        session_id,
        "Invoking agent {} ({})",
        request.agent_id,
        request.agent_alias_id
    );

    let events = invoker.invoke(&request).map_err(|err| match err {
        Error::RemoteInvocation(_) => err,
        other => Error::RemoteInvocation(other.to_string()),
    })?;

    Ok(TurnStream::new(
        events,
        Turn::new(session_id, input_text),
        directory,
    ))
}

fn check_profile(profile: &BotProfile) -> Result<()> {
    let missing: Vec<&str> = [
        ("agent_id", &profile.agent_id),
        ("agent_alias_id", &profile.agent_alias_id),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::ConfigurationIncomplete(format!(
            "bot '{}' is missing {}",
            profile.bot_name,
            missing.join(" and ")
        )))
    }
}

/// Lazy, single-pass sequence of answer fragments for one turn.
///
/// Each pulled item reads as many events as needed to produce the next
/// fragment. A transport error ends the turn. After exhaustion the usage
/// totals and the completed [`Turn`] are available.
pub struct TurnStream<'o> {
    events: EventStream,
    interpreter: TurnInterpreter,
    observer: Option<&'o mut dyn TraceObserver>,
    pending: VecDeque<String>,
    turn: Turn,
    output: String,
    state: StreamState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Reading,
    Draining,
    Done,
    Failed,
}

impl<'o> TurnStream<'o> {
    /// Interpret an already open event stream
    pub fn new(
        events: EventStream,
        turn: Turn,
        directory: Arc<dyn AgentDirectory + Send + Sync>,
    ) -> Self {
        Self {
            events,
            interpreter: TurnInterpreter::new(directory),
            observer: None,
            pending: VecDeque::new(),
            turn,
            output: String::new(),
            state: StreamState::Reading,
        }
    }

    pub fn with_observer(mut self, observer: &'o mut dyn TraceObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn usage(&self) -> UsageTotals {
        self.interpreter.usage()
    }

    pub fn session_id(&self) -> &str {
        &self.turn.session_id
    }

    /// Whether the whole stream was read without a transport error
    pub fn is_complete(&self) -> bool {
        self.state == StreamState::Done
    }

    /// The turn as seen so far; `output_text` is set only when complete
    pub fn into_turn(self) -> Turn {
        let mut turn = self.turn;
        turn.usage = self.interpreter.usage();
        turn.step_trace = self.interpreter.step_trace().to_vec();
        if self.state == StreamState::Done {
            turn.output_text = Some(self.output);
        }
        turn
    }

    fn dispatch(&mut self, interpretation: Interpretation) {
        if let Some(observer) = self.observer.as_deref_mut() {
            for update in &interpretation.updates {
                observer.on_update(update);
            }
        }
        self.pending.extend(interpretation.fragments);
    }

    fn finish(&mut self) {
        let interpretation = self.interpreter.finish();
        self.dispatch(interpretation);
        self.state = StreamState::Draining;

        let usage = self.interpreter.usage();
        tracing::info!(
            session_id = %self.turn.session_id,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            llm_calls = usage.llm_calls,
            "Turn finished"
        );
    }
}

impl Iterator for TurnStream<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(fragment) = self.pending.pop_front() {
                self.output.push_str(&fragment);
                return Some(Ok(fragment));
            }

            match self.state {
                StreamState::Reading => {}
                StreamState::Draining => {
                    self.state = StreamState::Done;
                    return None;
                }
                StreamState::Done | StreamState::Failed => return None,
            }

            match self.events.next() {
                Some(Ok(raw)) => {
                    let interpretation = self.interpreter.apply(&raw, Utc::now());
                    self.dispatch(interpretation);
                }
                Some(Err(err)) => {
                    self.state = StreamState::Failed;
                    tracing::error!(session_id = %self.turn.session_id, "Event stream failed: {}", err);
                    return Some(Err(match err {
                        Error::RemoteInvocation(_) => err,
                        other => Error::RemoteInvocation(other.to_string()),
                    }));
                }
                None => self.finish(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agconsole_engine::NoDirectory;
    use agconsole_providers::RawEvent;
    use agconsole_types::ProcessingMode;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn profile(agent_id: &str, alias: &str) -> BotProfile {
        BotProfile {
            bot_name: "bot".to_string(),
            agent_id: agent_id.to_string(),
            agent_alias_id: alias.to_string(),
            region: None,
            session_attributes: None,
            tasks: None,
            start_prompt: None,
            additional_instructions: None,
            processing_mode: ProcessingMode::Sequential,
            inputs: BTreeMap::new(),
        }
    }

    struct PanickingInvoker;

    impl AgentInvoker for PanickingInvoker {
        fn invoke(&self, _request: &InvocationRequest) -> Result<EventStream> {
            panic!("must not be called");
        }
    }

    struct FailingInvoker;

    impl AgentInvoker for FailingInvoker {
        fn invoke(&self, _request: &InvocationRequest) -> Result<EventStream> {
            Err(Error::Io(std::io::Error::other("connection reset")))
        }
    }

    #[test]
    fn test_incomplete_profile_fails_before_invocation() {
        let result = invoke(
            &PanickingInvoker,
            &profile("", "ALIAS"),
            "s-1",
            "hi",
            Arc::new(NoDirectory),
        );
        match result {
            Err(Error::ConfigurationIncomplete(msg)) => assert!(msg.contains("agent_id")),
            _ => panic!("Expected ConfigurationIncomplete"),
        }
    }

    #[test]
    fn test_invoke_errors_become_remote_failures() {
        let result = invoke(
            &FailingInvoker,
            &profile("AGENT", "ALIAS"),
            "s-1",
            "hi",
            Arc::new(NoDirectory),
        );
        match result {
            Err(Error::RemoteInvocation(msg)) => assert!(msg.contains("connection reset")),
            _ => panic!("Expected RemoteInvocation"),
        }
    }

    #[test]
    fn test_stream_error_ends_turn() {
        let events: Vec<Result<RawEvent>> = vec![
            Ok(RawEvent::from_value(json!({"chunk": {"bytes": "partial"}})).unwrap()),
            Err(Error::Config("broken".to_string())),
            Ok(RawEvent::from_value(json!({"chunk": {"bytes": "never"}})).unwrap()),
        ];
        let mut stream = TurnStream::new(
            Box::new(events.into_iter()),
            Turn::new("s-1", "hi"),
            Arc::new(NoDirectory),
        );

        assert_eq!(stream.next().unwrap().unwrap(), "partial");
        assert!(matches!(stream.next(), Some(Err(Error::RemoteInvocation(_)))));
        assert!(stream.next().is_none());
        assert!(!stream.is_complete());
        assert!(stream.into_turn().output_text.is_none());
    }
}
