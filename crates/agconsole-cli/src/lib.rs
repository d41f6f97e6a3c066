mod args;
mod commands;
mod handlers;
pub mod logging;
pub mod presentation;

pub use args::{Cli, Commands, Language, LogLevel};
pub use commands::run;
