// Error types
pub mod error;

// Wire schema of the agent-invocation event stream
pub mod schema;

// Event classification
pub mod classifier;

// JSONL recordings
pub mod io;

pub use classifier::{Classified, ClassifierContext, classify};
pub use error::{Error, Result};
pub use io::{parse_event_line, read_recording};
pub use schema::RawEvent;
