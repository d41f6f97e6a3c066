use anyhow::Result;
use std::io;
use std::path::PathBuf;
use uuid::Uuid;

use super::HandlerContext;

pub fn handle(
    ctx: &HandlerContext,
    text: &str,
    bot: Option<&str>,
    events: Option<PathBuf>,
) -> Result<()> {
    let session = ctx.open_bot(bot, events)?;
    let session_id = Uuid::new_v4().to_string();

    let mut stdout = io::stdout().lock();
    let turn = ctx.run_turn(
        &session.invoker,
        &session.profile,
        &session_id,
        text,
        &mut stdout,
        None,
    )?;

    tracing::info!(
        bot = %session.profile.bot_name,
        steps = turn.step_trace.len(),
        total_tokens = turn.usage.total_tokens(),
        "Answered"
    );
    Ok(())
}
