//! Testing infrastructure for agconsole tests.
//!
//! - `events`: builders for raw wire events of the agent-invocation stream
//! - `invoker`: an in-memory `AgentInvoker` that replays scripted events
//! - `world`: isolated CLI environment with config, recordings and task files

pub mod events;
pub mod invoker;
pub mod world;

pub use invoker::ScriptedInvoker;
pub use world::{CliResult, TestWorld};
