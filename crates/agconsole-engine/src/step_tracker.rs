use agconsole_types::{RoutingDecision, RoutingOutcome, StepNumber, StepRecord};

/// Active agent name before any collaborator has been selected
pub const INITIAL_AGENT_NAME: &str = " ";

/// Step counter and active collaborator for one turn.
///
/// The counter only moves forward: routing decisions and top-level
/// rationales open a new integer step, nested rationales open a sub-step
/// under the current one.
#[derive(Debug, Clone)]
pub struct StepTracker {
    current: StepNumber,
    active_agent: String,
    history: Vec<StepRecord>,
}

impl Default for StepTracker {
    fn default() -> Self {
        Self {
            current: StepNumber::ZERO,
            active_agent: INITIAL_AGENT_NAME.to_string(),
            history: Vec::new(),
        }
    }
}

impl StepTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> StepNumber {
        self.current
    }

    pub fn active_agent(&self) -> &str {
        &self.active_agent
    }

    /// Records produced so far, in order
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply a routing decision. Returns the new step record, or `None`
    /// when the classifier could not decide.
    pub fn on_routing_decision(&mut self, decision: &RoutingDecision) -> Option<StepRecord> {
        match decision.outcome {
            RoutingOutcome::Undecidable => return None,
            RoutingOutcome::Continue => {}
            RoutingOutcome::Switch => {
                if let Some(name) = &decision.collaborator_name {
                    self.active_agent = name.clone();
                }
            }
        }

        self.current = self.current.next_major();
        Some(self.record(self.active_agent.clone(), false))
    }

    /// Apply a rationale emitted by `agent_name` with the given caller chain
    /// length. Chains longer than one come from nested collaborators.
    pub fn on_rationale(&mut self, caller_chain_len: usize, agent_name: &str) -> StepRecord {
        let is_sub_agent = caller_chain_len > 1;
        self.current = if is_sub_agent {
            self.current.next_minor()
        } else {
            self.current.next_major()
        };
        self.record(agent_name.to_string(), is_sub_agent)
    }

    fn record(&mut self, agent_name: String, is_sub_agent: bool) -> StepRecord {
        let record = StepRecord {
            step: self.current,
            agent_name,
            is_sub_agent,
        };
        self.history.push(record.clone());
        record
    }
}
