use agconsole_providers::RawEvent;
use agconsole_runtime::{AgentInvoker, Error, EventStream, InvocationRequest, Result};
use std::sync::Mutex;

/// Answers every invocation with the same scripted events and remembers
/// the requests it received
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    events: Vec<RawEvent>,
    fail_with: Option<String>,
    requests: Mutex<Vec<InvocationRequest>>,
}

impl ScriptedInvoker {
    pub fn new(events: Vec<RawEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    /// Invoker whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<InvocationRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl AgentInvoker for ScriptedInvoker {
    fn invoke(&self, request: &InvocationRequest) -> Result<EventStream> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());

        if let Some(message) = &self.fail_with {
            return Err(Error::RemoteInvocation(message.clone()));
        }

        Ok(Box::new(self.events.clone().into_iter().map(Ok)))
    }
}
