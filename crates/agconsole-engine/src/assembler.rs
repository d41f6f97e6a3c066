/// Separator placed between streamed supervisor narration and the
/// collaborator answer appended at the end of the turn
pub const COLLABORATOR_ANSWER_SEPARATOR: &str = "\n\n";

/// Decides which text reaches the user.
///
/// Supervisor chunks stream through until a collaborator answer is observed;
/// from then on chunks are suppressed, and the collaborator answer is
/// emitted once when the turn finishes.
#[derive(Debug, Clone, Default)]
pub struct ResponseStreamAssembler {
    collaborator_answer: Option<String>,
    emitted_any: bool,
    finished: bool,
}

impl ResponseStreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collaborator_answer_seen(&self) -> bool {
        self.collaborator_answer.is_some()
    }

    /// Returns the chunk when it should be shown now
    pub fn on_text_chunk(&mut self, text: &str) -> Option<String> {
        if self.finished || self.collaborator_answer_seen() || text.trim().is_empty() {
            return None;
        }

        self.emitted_any = true;
        Some(text.to_string())
    }

    /// Capture a collaborator answer. An empty answer is not authoritative
    /// and leaves streaming untouched; a later answer replaces an earlier one.
    pub fn on_collaborator_output(&mut self, text: &str) {
        if self.finished || text.is_empty() {
            return;
        }
        self.collaborator_answer = Some(text.to_string());
    }

    /// Final fragment of the turn, if any. Yields the collaborator answer at
    /// most once.
    pub fn finish(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }
        self.finished = true;

        let answer = self.collaborator_answer.take()?;
        if self.emitted_any {
            Some(format!("{}{}", COLLABORATOR_ANSWER_SEPARATOR, answer))
        } else {
            Some(answer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supervisor_chunks_stream_through() {
        let mut asm = ResponseStreamAssembler::new();
        assert_eq!(asm.on_text_chunk("Sure, ").as_deref(), Some("Sure, "));
        assert_eq!(asm.on_text_chunk("I can help.").as_deref(), Some("I can help."));
        assert_eq!(asm.finish(), None);
    }

    #[test]
    fn test_blank_chunks_are_dropped() {
        let mut asm = ResponseStreamAssembler::new();
        assert_eq!(asm.on_text_chunk("   \n"), None);
        assert_eq!(asm.on_text_chunk(""), None);
    }

    #[test]
    fn test_collaborator_answer_suppresses_later_chunks() {
        let mut asm = ResponseStreamAssembler::new();
        assert!(asm.on_text_chunk("Let me check. ").is_some());

        asm.on_collaborator_output("Reserved for 7pm.");
        assert!(asm.collaborator_answer_seen());
        assert_eq!(asm.on_text_chunk("It is reserved."), None);

        assert_eq!(asm.finish().as_deref(), Some("\n\nReserved for 7pm."));
        assert_eq!(asm.finish(), None);
    }

    #[test]
    fn test_answer_without_prior_output_has_no_separator() {
        let mut asm = ResponseStreamAssembler::new();
        asm.on_collaborator_output("Done.");
        assert_eq!(asm.finish().as_deref(), Some("Done."));
    }

    #[test]
    fn test_empty_answer_is_ignored() {
        let mut asm = ResponseStreamAssembler::new();
        asm.on_collaborator_output("");
        assert!(!asm.collaborator_answer_seen());
        assert!(asm.on_text_chunk("still streaming").is_some());
    }

    #[test]
    fn test_latest_answer_wins() {
        let mut asm = ResponseStreamAssembler::new();
        asm.on_collaborator_output("first");
        asm.on_collaborator_output("second");
        assert_eq!(asm.finish().as_deref(), Some("second"));
    }

    #[test]
    fn test_nothing_after_finish() {
        let mut asm = ResponseStreamAssembler::new();
        asm.finish();
        assert_eq!(asm.on_text_chunk("late"), None);
    }
}
