use agconsole_runtime::Config;
use anyhow::Result;

use super::args::{Cli, Commands};
use super::handlers;
use super::handlers::HandlerContext;
use crate::logging;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load_from(&config_path)?;
    tracing::debug!(path = %config_path.display(), bots = config.bots.len(), "Loaded config");

    let ctx = HandlerContext::new(config, config_path, cli.lang, !cli.no_trace);

    match cli.command {
        Commands::Bots { json } => handlers::bots::handle(&ctx, json),
        Commands::Ask { text, bot, events } => {
            handlers::ask::handle(&ctx, &text, bot.as_deref(), events)
        }
        Commands::Chat { bot, events } => handlers::chat::handle(&ctx, bot.as_deref(), events),
        Commands::Replay { file } => handlers::replay::handle(&ctx, &file),
    }
}
