use agconsole_engine::AgentDirectory;
use agconsole_runtime::{
    AgentInvoker, BotProfileResolver, Config, ReplayInvoker, StaticCatalog, StaticDirectory,
    TurnStream, invoke,
};
use agconsole_types::{BotProfile, Turn};
use anyhow::{Result, bail};
use is_terminal::IsTerminal;
use std::io::{self, Stderr, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::args::Language;
use crate::presentation::ConsoleTraceRenderer;

/// Shared state for handler execution
pub struct HandlerContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub language: Language,
    pub show_trace: bool,
}

/// A resolved bot together with the source of its event streams
pub struct BotSession {
    pub profile: BotProfile,
    pub invoker: ReplayInvoker,
}

impl HandlerContext {
    pub fn new(config: Config, config_path: PathBuf, language: Language, show_trace: bool) -> Self {
        Self {
            config,
            config_path,
            language,
            show_trace,
        }
    }

    pub fn catalog(&self) -> StaticCatalog {
        StaticCatalog::from_config(&self.config)
    }

    pub fn directory(&self) -> Arc<dyn AgentDirectory + Send + Sync> {
        Arc::new(StaticDirectory::from_config(&self.config))
    }

    /// Resolve the selected bot and pick its event source: `events` if
    /// given, otherwise the bot's `replay` entry.
    pub fn open_bot(&self, bot: Option<&str>, events: Option<PathBuf>) -> Result<BotSession> {
        let bot_config = self.config.select_bot(bot)?;
        let catalog = self.catalog();
        let profile = BotProfileResolver::new(&self.config, &catalog).resolve(bot_config)?;

        let recording = match events {
            Some(path) => path,
            None => match &bot_config.replay {
                Some(path) => self.config.resolve_path(path),
                None => bail!(
                    "Bot '{}' has no event source; pass --events FILE or set `replay` in the config",
                    bot_config.bot_name
                ),
            },
        };

        tracing::debug!(
            bot = %profile.bot_name,
            recording = %recording.display(),
            "Opened bot"
        );

        Ok(BotSession {
            profile,
            invoker: ReplayInvoker::new(recording),
        })
    }

    /// Trace renderer on stderr, unless the trace is switched off
    pub fn trace_renderer(&self) -> Option<ConsoleTraceRenderer<Stderr>> {
        if !self.show_trace {
            return None;
        }
        let color = io::stderr().is_terminal();
        Some(ConsoleTraceRenderer::new(io::stderr(), self.language, color))
    }

    /// Run one turn and stream its answer to `out`.
    ///
    /// When `cancel` is raised the stream is abandoned after the current
    /// fragment and the incomplete turn is returned.
    pub fn run_turn<W: Write>(
        &self,
        invoker: &dyn AgentInvoker,
        profile: &BotProfile,
        session_id: &str,
        text: &str,
        out: &mut W,
        cancel: Option<&AtomicBool>,
    ) -> Result<Turn> {
        let mut renderer = self.trace_renderer();
        let mut stream = invoke(invoker, profile, session_id, text, self.directory())?;
        if let Some(renderer) = renderer.as_mut() {
            stream = stream.with_observer(renderer);
        }
        drain(stream, out, cancel)
    }
}

/// Write every fragment of `stream` to `out` as it arrives
pub fn drain<W: Write>(
    mut stream: TurnStream<'_>,
    out: &mut W,
    cancel: Option<&AtomicBool>,
) -> Result<Turn> {
    let mut wrote = false;
    while let Some(fragment) = stream.next() {
        if cancel.is_some_and(|flag| flag.swap(false, Ordering::SeqCst)) {
            tracing::info!(session_id = stream.session_id(), "Turn interrupted");
            break;
        }
        let fragment = fragment?;
        write!(out, "{}", fragment)?;
        out.flush()?;
        wrote = true;
    }
    if wrote {
        writeln!(out)?;
    }
    Ok(stream.into_turn())
}
