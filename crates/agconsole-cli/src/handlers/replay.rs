use agconsole_providers::read_recording;
use agconsole_runtime::{Error as RuntimeError, EventStream, TurnStream};
use agconsole_types::Turn;
use anyhow::{Context, Result};
use std::io;
use std::path::Path;
use uuid::Uuid;

use super::{HandlerContext, drain};

pub fn handle(ctx: &HandlerContext, file: &Path) -> Result<()> {
    let reader = read_recording(file)
        .with_context(|| format!("Cannot open recording {}", file.display()))?;
    let events: EventStream = Box::new(reader.map(|item| item.map_err(RuntimeError::from)));

    let turn = Turn::new(Uuid::new_v4().to_string(), "");
    let mut renderer = ctx.trace_renderer();
    let mut stream = TurnStream::new(events, turn, ctx.directory());
    if let Some(renderer) = renderer.as_mut() {
        stream = stream.with_observer(renderer);
    }

    let mut stdout = io::stdout().lock();
    let turn = drain(stream, &mut stdout, None)?;

    tracing::info!(
        recording = %file.display(),
        steps = turn.step_trace.len(),
        llm_calls = turn.usage.llm_calls,
        "Replay finished"
    );
    Ok(())
}
