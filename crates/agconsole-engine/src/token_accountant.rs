use agconsole_types::{TokenUsage, UsageTotals};

/// Running token totals for one turn.
///
/// A call reporting at least one count bumps `llm_calls` by one; a missing
/// count adds zero to its side. A call reporting neither is not counted.
#[derive(Debug, Clone, Default)]
pub struct TokenAccountant {
    totals: UsageTotals,
}

impl TokenAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, input_tokens: Option<u32>, output_tokens: Option<u32>) {
        if input_tokens.is_none() && output_tokens.is_none() {
            return;
        }
        self.totals.input_tokens += u64::from(input_tokens.unwrap_or(0));
        self.totals.output_tokens += u64::from(output_tokens.unwrap_or(0));
        self.totals.llm_calls += 1;
    }

    pub fn add_usage(&mut self, usage: &TokenUsage) {
        self.add(usage.input_tokens, usage.output_tokens);
    }

    pub fn snapshot(&self) -> UsageTotals {
        self.totals
    }
}
