use agconsole_types::ProcessingMode;

const SEQUENTIAL_DIRECTIVE: &str = "Please perform the following tasks sequentially. \
Be sure you do not perform any of the tasks in parallel. \
If a task will require information produced from a prior task, \
be sure to include the full text details as comprehensive input to the task.";

const PARALLEL_DIRECTIVE: &str = "Please perform as many of the following tasks in parallel where possible. \
When a dependency between tasks is clear, execute those tasks in sequential order. \
If a task will require information produced from a prior task, \
be sure to include the comprehensive text details as input to the task.";

const REVIEW_REMINDER: &str = "Before returning the final answer, \
review whether you have achieved the expected output for each task.";

/// Composes declarative task descriptions into one instruction string.
///
/// Output layout:
///
/// ```text
/// <mode directive>
///
/// Task 1. <first task>
/// Task 2. <second task>
///
/// <review reminder>
/// <additional instructions, if any>
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskPromptBuilder {
    mode: ProcessingMode,
    additional_instructions: Option<String>,
}

impl TaskPromptBuilder {
    pub fn new(mode: ProcessingMode) -> Self {
        Self {
            mode,
            additional_instructions: None,
        }
    }

    pub fn with_additional_instructions(mut self, instructions: Option<impl Into<String>>) -> Self {
        self.additional_instructions = instructions.map(Into::into);
        self
    }

    pub fn build<S: AsRef<str>>(&self, tasks: &[S]) -> String {
        let mut prompt = String::new();

        prompt.push_str(match self.mode {
            ProcessingMode::Sequential => SEQUENTIAL_DIRECTIVE,
            ProcessingMode::AllowParallel => PARALLEL_DIRECTIVE,
        });
        prompt.push_str("\n\n");

        for (index, task) in tasks.iter().enumerate() {
            prompt.push_str(&format!("Task {}. {}\n", index + 1, task.as_ref()));
        }

        prompt.push('\n');
        prompt.push_str(REVIEW_REMINDER);

        if let Some(instructions) = self
            .additional_instructions
            .as_deref()
            .filter(|s| !s.is_empty())
        {
            prompt.push('\n');
            prompt.push_str(instructions);
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_prompt_layout() {
        let prompt = TaskPromptBuilder::new(ProcessingMode::Sequential)
            .with_additional_instructions(Some("Answer in English."))
            .build(&["Find a restaurant", "Book a table"]);

        insta::assert_snapshot!(prompt, @r"
        Please perform the following tasks sequentially. Be sure you do not perform any of the tasks in parallel. If a task will require information produced from a prior task, be sure to include the full text details as comprehensive input to the task.

        Task 1. Find a restaurant
        Task 2. Book a table

        Before returning the final answer, review whether you have achieved the expected output for each task.
        Answer in English.
        ");
    }

    #[test]
    fn test_tasks_are_numbered_in_input_order() {
        let tasks = ["alpha", "beta", "gamma", "delta"];
        let prompt = TaskPromptBuilder::new(ProcessingMode::Sequential).build(&tasks);

        let mut last = 0;
        for (i, task) in tasks.iter().enumerate() {
            let line = format!("Task {}. {}", i + 1, task);
            let pos = prompt.find(&line).expect("task line present");
            assert!(pos >= last);
            last = pos;
        }
        assert!(!prompt.contains("Task 5."));
    }

    #[test]
    fn test_modes_are_exclusive() {
        let sequential = TaskPromptBuilder::new(ProcessingMode::Sequential).build(&["a"]);
        assert!(sequential.contains(SEQUENTIAL_DIRECTIVE));
        assert!(!sequential.contains(PARALLEL_DIRECTIVE));

        let parallel = TaskPromptBuilder::new(ProcessingMode::AllowParallel).build(&["a"]);
        assert!(parallel.contains(PARALLEL_DIRECTIVE));
        assert!(!parallel.contains(SEQUENTIAL_DIRECTIVE));
    }

    #[test]
    fn test_without_additional_instructions_ends_with_reminder() {
        let prompt = TaskPromptBuilder::new(ProcessingMode::AllowParallel)
            .with_additional_instructions(None::<String>)
            .build(&["only task"]);
        assert!(prompt.ends_with(REVIEW_REMINDER));
    }

    #[test]
    fn test_deterministic() {
        let builder = TaskPromptBuilder::new(ProcessingMode::Sequential)
            .with_additional_instructions(Some("extra"));
        assert_eq!(builder.build(&["x", "y"]), builder.build(&["x", "y"]));
    }
}
