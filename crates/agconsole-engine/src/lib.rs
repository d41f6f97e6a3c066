// Engine module - pure interpretation of one turn's event stream
// This layer sits between classified events (providers) and the runtime/CLI

pub mod assembler;
pub mod directory;
pub mod interpreter;
pub mod prompt;
pub mod step_tracker;
pub mod token_accountant;
pub mod trace;

pub use assembler::ResponseStreamAssembler;
pub use directory::{AgentDirectory, NoDirectory};
pub use interpreter::{Interpretation, TurnInterpreter};
pub use prompt::TaskPromptBuilder;
pub use step_tracker::{INITIAL_AGENT_NAME, StepTracker};
pub use token_accountant::TokenAccountant;
pub use trace::TraceUpdate;
