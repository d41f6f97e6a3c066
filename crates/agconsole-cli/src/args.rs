use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agconsole")]
#[command(about = "Chat with a managed agent and watch its execution trace", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: $AGCONSOLE_PATH/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Language of the trace output
    #[arg(long, default_value = "en", global = true)]
    pub lang: Language,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Do not render the execution trace
    #[arg(long, global = true)]
    pub no_trace: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured bots and whether their agent ids resolve
    Bots {
        /// Print resolved profiles as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send one message and print the answer
    Ask {
        text: String,

        /// Bot to talk to (default: $BOT_NAME, then the configured default)
        #[arg(long)]
        bot: Option<String>,

        /// Recorded event stream to answer from
        #[arg(long)]
        events: Option<PathBuf>,
    },

    /// Interactive conversation on stdin; `/exit` leaves
    Chat {
        #[arg(long)]
        bot: Option<String>,

        #[arg(long)]
        events: Option<PathBuf>,
    },

    /// Interpret a recorded event stream without a bot
    Replay { file: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    #[default]
    #[value(alias = "english")]
    En,
    #[value(alias = "chinese")]
    Zh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
