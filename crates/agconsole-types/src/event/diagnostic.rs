use serde::{Deserialize, Serialize};

/// Non-fatal irregularity observed while classifying a trace frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A recognized frame had a missing or malformed sub-field
    TraceParseDegraded,
    /// A frame matched none of the recognized shapes
    UnknownEventShape,
}

impl Diagnostic {
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::TraceParseDegraded,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::UnknownEventShape,
            message: message.into(),
        }
    }
}
