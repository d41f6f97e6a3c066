use agconsole_types::{
    Diagnostic, InvocationInput, Observation, RoutingDecision, StepNumber, StepRecord,
    UsageTotals,
};
use serde::Serialize;

/// Something worth showing in the live trace of a turn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum TraceUpdate {
    /// The routing classifier was invoked
    RoutingStarted,
    /// The routing classifier answered
    RoutingResolved {
        decision: RoutingDecision,
        step: StepNumber,
    },
    /// A new step was opened by an agent's rationale
    Step { record: StepRecord, rationale: String },
    Invocation(InvocationInput),
    Observation(Observation),
    /// A trace frame could only be partially read
    Degraded(Diagnostic),
    /// Token totals at the end of the turn
    Finished(UsageTotals),
}
