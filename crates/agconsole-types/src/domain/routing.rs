use serde::{Deserialize, Serialize};

/// Classification meaning "no collaborator matches, the supervisor handles it"
pub const UNDECIDABLE: &str = "undecidable";

/// Classification meaning "stay with the collaborator of the previous turn"
pub const KEEP_PREVIOUS_AGENT: &str = "keep_previous_agent";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingOutcome {
    /// Revert to supervisor mode; nothing changes
    Undecidable,
    /// Continue with the active collaborator
    Continue,
    /// Switch to a new collaborator
    Switch,
}

/// Result of one routing-classifier call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub classification: String,
    pub elapsed_seconds: f64,
    pub outcome: RoutingOutcome,
    /// Collaborator in charge after the decision; `None` when undecidable
    pub collaborator_name: Option<String>,
}

impl RoutingDecision {
    /// Map a classification onto the three routing outcomes relative to the
    /// currently active collaborator.
    pub fn from_classification(
        classification: impl Into<String>,
        active_agent: &str,
        elapsed_seconds: f64,
    ) -> Self {
        let classification = classification.into();

        let (outcome, collaborator_name) = if classification == UNDECIDABLE {
            (RoutingOutcome::Undecidable, None)
        } else if classification == KEEP_PREVIOUS_AGENT || classification == active_agent {
            (RoutingOutcome::Continue, Some(active_agent.to_string()))
        } else {
            (RoutingOutcome::Switch, Some(classification.clone()))
        };

        Self {
            classification,
            elapsed_seconds,
            outcome,
            collaborator_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undecidable() {
        let decision = RoutingDecision::from_classification("undecidable", "booking", 0.4);
        assert_eq!(decision.outcome, RoutingOutcome::Undecidable);
        assert_eq!(decision.collaborator_name, None);
    }

    #[test]
    fn test_keep_previous_and_same_name_continue() {
        let keep = RoutingDecision::from_classification("keep_previous_agent", "booking", 0.1);
        assert_eq!(keep.outcome, RoutingOutcome::Continue);
        assert_eq!(keep.collaborator_name.as_deref(), Some("booking"));

        let same = RoutingDecision::from_classification("booking", "booking", 0.1);
        assert_eq!(same.outcome, RoutingOutcome::Continue);
    }

    #[test]
    fn test_new_name_switches() {
        let decision = RoutingDecision::from_classification("restaurant-agent", " ", 1.25);
        assert_eq!(decision.outcome, RoutingOutcome::Switch);
        assert_eq!(decision.collaborator_name.as_deref(), Some("restaurant-agent"));
        assert_eq!(decision.elapsed_seconds, 1.25);
    }
}
