use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional increment shown for each nested collaborator step.
///
/// Display policy only: ordering is carried by the integer pair in
/// [`StepNumber`], so more than nine sub-steps never collide.
pub const SUB_STEP_INCREMENT: f64 = 0.1;

/// Largest fraction the `f64` projection of a sub-step may reach
const MAX_SUB_STEP_FRACTION: f64 = 0.9;

/// Two-level step label: `major` counts supervisor steps, `minor` counts
/// nested collaborator steps under the current major step.
///
/// Ordering is lexicographic on `(major, minor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct StepNumber {
    pub major: u32,
    pub minor: u32,
}

impl StepNumber {
    pub const ZERO: StepNumber = StepNumber { major: 0, minor: 0 };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Next integer step: `floor(step + 1)`
    pub fn next_major(self) -> Self {
        Self {
            major: self.major + 1,
            minor: 0,
        }
    }

    /// Next fractional sub-step under the same major step
    pub fn next_minor(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor + 1,
        }
    }

    pub fn is_sub_step(&self) -> bool {
        self.minor > 0
    }

    /// Numeric projection, e.g. `3.1`.
    ///
    /// Non-decreasing in step order and always inside `[major, major + 1)`;
    /// from the tenth sub-step on the fraction stays at `0.9`.
    pub fn as_f64(&self) -> f64 {
        let fraction = (self.minor as f64 * SUB_STEP_INCREMENT).min(MAX_SUB_STEP_FRACTION);
        self.major as f64 + fraction
    }
}

impl fmt::Display for StepNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minor == 0 {
            write!(f, "{}", self.major)
        } else {
            write!(f, "{}.{}", self.major, self.minor)
        }
    }
}

/// One labelled stage in the trace of a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: StepNumber,
    pub agent_name: String,
    pub is_sub_agent: bool,
}

impl StepRecord {
    pub fn step_number(&self) -> f64 {
        self.step.as_f64()
    }
}
