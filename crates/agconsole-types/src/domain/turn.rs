use serde::{Deserialize, Serialize};

use super::step::StepRecord;
use crate::event::UsageTotals;

/// One user utterance and the answer assembled for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub session_id: String,
    pub input_text: String,
    /// Populated once the answer is fully assembled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_text: Option<String>,
    pub usage: UsageTotals,
    pub step_trace: Vec<StepRecord>,
}

impl Turn {
    pub fn new(session_id: impl Into<String>, input_text: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            input_text: input_text.into(),
            output_text: None,
            usage: UsageTotals::default(),
            step_trace: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.output_text.is_some()
    }
}
