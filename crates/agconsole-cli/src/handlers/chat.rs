use agconsole_runtime::Conversation;
use anyhow::Result;
use is_terminal::IsTerminal;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::HandlerContext;

const APOLOGY: &str = "I encountered an error processing your request. Please try again.";

pub fn handle(ctx: &HandlerContext, bot: Option<&str>, events: Option<PathBuf>) -> Result<()> {
    let session = ctx.open_bot(bot, events)?;
    let mut conversation = Conversation::new();

    // Ctrl-C abandons the running turn; at the prompt it leaves
    let in_turn = Arc::new(AtomicBool::new(false));
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let in_turn = Arc::clone(&in_turn);
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || {
            if in_turn.load(Ordering::SeqCst) {
                interrupted.store(true, Ordering::SeqCst);
            } else {
                std::process::exit(130);
            }
        })?;
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut input = stdin.lock();
    let mut stdout = io::stdout().lock();

    tracing::info!(
        bot = %session.profile.bot_name,
        session_id = conversation.session_id(),
        "Conversation started"
    );

    if let Some(prompt) = &session.profile.start_prompt {
        writeln!(stdout, "{}", prompt)?;
    }

    loop {
        if interactive {
            write!(stdout, "> ")?;
            stdout.flush()?;
        }

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if matches!(text, "/exit" | "/quit") {
            break;
        }

        in_turn.store(true, Ordering::SeqCst);
        let result = ctx.run_turn(
            &session.invoker,
            &session.profile,
            conversation.session_id(),
            text,
            &mut stdout,
            Some(interrupted.as_ref()),
        );
        in_turn.store(false, Ordering::SeqCst);
        interrupted.store(false, Ordering::SeqCst);

        match result {
            Ok(turn) => {
                if !turn.is_complete() {
                    eprintln!("[interrupted]");
                }
                conversation.push(turn);
            }
            Err(err) => {
                tracing::warn!(session_id = conversation.session_id(), "Turn failed: {}", err);
                eprintln!("Error: {}", err);
                writeln!(stdout, "{}", APOLOGY)?;
            }
        }
    }

    tracing::info!(
        session_id = conversation.session_id(),
        turns = conversation.turns().len(),
        "Conversation ended"
    );
    Ok(())
}
