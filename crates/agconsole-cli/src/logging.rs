use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::args::LogLevel;

/// Install the stderr log subscriber. `RUST_LOG` overrides `level`.
pub fn init(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
