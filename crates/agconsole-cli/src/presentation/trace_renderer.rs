use agconsole_engine::TraceUpdate;
use agconsole_runtime::TraceObserver;
use agconsole_types::{
    DiagnosticKind, InvocationInput, Observation, RoutingDecision, RoutingOutcome, StepRecord,
    UNKNOWN_FUNCTION, UsageTotals,
};
use owo_colors::OwoColorize;
use std::io::{self, Write};

use super::format::{PREVIEW_CHARS, preview, table};
use super::text::{TraceText, fill};
use crate::args::Language;

/// Writes trace updates as readable text, typically to stderr
pub struct ConsoleTraceRenderer<W: Write> {
    out: W,
    text: &'static TraceText,
    color: bool,
}

impl<W: Write> ConsoleTraceRenderer<W> {
    pub fn new(out: W, language: Language, color: bool) -> Self {
        Self {
            out,
            text: TraceText::for_language(language),
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint_bold(&self, s: &str) -> String {
        if self.color { s.bold().to_string() } else { s.to_string() }
    }

    fn paint_blue(&self, s: &str) -> String {
        if self.color { s.blue().bold().to_string() } else { s.to_string() }
    }

    fn paint_red(&self, s: &str) -> String {
        if self.color { s.red().to_string() } else { s.to_string() }
    }

    fn paint_yellow(&self, s: &str) -> String {
        if self.color { s.yellow().to_string() } else { s.to_string() }
    }

    fn paint_dimmed(&self, s: &str) -> String {
        if self.color { s.dimmed().to_string() } else { s.to_string() }
    }

    pub fn render(&mut self, update: &TraceUpdate) -> io::Result<()> {
        match update {
            TraceUpdate::RoutingStarted => {
                let line = self.paint_bold(self.text.choosing_collaborator);
                writeln!(self.out, "{}", line)
            }
            TraceUpdate::RoutingResolved { decision, .. } => self.render_routing(decision),
            TraceUpdate::Step { record, rationale } => self.render_step(record, rationale),
            TraceUpdate::Invocation(input) => self.render_invocation(input),
            TraceUpdate::Observation(observation) => self.render_observation(observation),
            TraceUpdate::Degraded(diagnostic) => {
                if diagnostic.kind != DiagnosticKind::TraceParseDegraded {
                    return Ok(());
                }
                let line = self.paint_yellow(&format!("{}{}", self.text.degraded, diagnostic.message));
                writeln!(self.out, "{}", line)
            }
            TraceUpdate::Finished(usage) => self.render_totals(usage),
        }
    }

    fn render_routing(&mut self, decision: &RoutingDecision) -> io::Result<()> {
        let t = self.text;
        let message = match decision.outcome {
            RoutingOutcome::Undecidable => t.no_matching.to_string(),
            RoutingOutcome::Continue => t.continue_conversation.to_string(),
            RoutingOutcome::Switch => fill(
                t.use_collaborator,
                decision.collaborator_name.as_deref().unwrap_or_default(),
            ),
        };
        let elapsed = fill(
            t.intent_classifier,
            &format!("{:.1}", decision.elapsed_seconds),
        );

        writeln!(self.out, "{}", message)?;
        let elapsed = self.paint_dimmed(&elapsed);
        writeln!(self.out, "{}", elapsed)
    }

    fn render_step(&mut self, record: &StepRecord, rationale: &str) -> io::Result<()> {
        let t = self.text;
        let heading = if record.is_sub_agent {
            format!(
                "{} {} {} {}",
                t.step,
                record.step,
                t.sub_agent,
                self.paint_red(&record.agent_name)
            )
        } else {
            format!("{} {}", t.step, self.paint_blue(&record.step.to_string()))
        };

        writeln!(self.out)?;
        writeln!(self.out, "{}", heading)?;
        for line in rationale.lines() {
            writeln!(self.out, "  {}", line)?;
        }
        Ok(())
    }

    fn render_invocation(&mut self, input: &InvocationInput) -> io::Result<()> {
        let t = self.text;
        match input {
            InvocationInput::KnowledgeBaseLookup(kb) => {
                let title = self.paint_bold(t.using_kb);
                writeln!(self.out, "{}", title)?;
                writeln!(self.out, "  {}{}", t.kb_id, kb.knowledge_base_id)?;
                writeln!(self.out, "  {}{}", t.query, kb.text)
            }
            InvocationInput::AgentCollaborator(collab) => {
                let title = self.paint_bold(&fill(t.collaborator_invoke, &collab.collaborator_name));
                writeln!(self.out, "{}", title)?;
                writeln!(self.out, "  {}{}", t.collaborator_name, collab.collaborator_name)?;
                writeln!(
                    self.out,
                    "  {}{}",
                    t.collaborator_input,
                    preview(&collab.input_text, PREVIEW_CHARS)
                )
            }
            InvocationInput::ActionGroup(action) => {
                let function = if action.function == UNKNOWN_FUNCTION {
                    t.unknown_function
                } else {
                    action.function.as_str()
                };
                let title = self.paint_bold(&format!("{}{}", t.invoking_tool, function));
                writeln!(self.out, "{}", title)?;
                writeln!(self.out, "  {}{}", t.function, function)?;
                if let Some(kind) = &action.execution_type {
                    writeln!(self.out, "  {}{}", t.kind, kind)?;
                }
                if let Some(params) = &action.parameters {
                    writeln!(self.out, "  {}", t.parameters)?;
                    let rows: Vec<(String, String)> = params
                        .iter()
                        .map(|p| (p.name.clone(), p.value.clone()))
                        .collect();
                    for line in table((t.param_name, t.param_value), &rows) {
                        writeln!(self.out, "  {}", line)?;
                    }
                }
                Ok(())
            }
            InvocationInput::CodeInterpreter(code) => {
                let title = self.paint_bold(t.code_interpreter);
                writeln!(self.out, "{}", title)?;
                for line in code.code.lines() {
                    writeln!(self.out, "    {}", line)?;
                }
                Ok(())
            }
        }
    }

    fn render_observation(&mut self, observation: &Observation) -> io::Result<()> {
        let t = self.text;
        match observation {
            Observation::KnowledgeBaseLookup(kb) => {
                let title = self.paint_bold(t.kb_response);
                writeln!(self.out, "{}", title)?;
                writeln!(self.out, "  {} {}", kb.references.len(), t.references)?;
                for (i, reference) in kb.references.iter().enumerate() {
                    writeln!(
                        self.out,
                        "  ({}) {}",
                        i + 1,
                        preview(&reference.text, PREVIEW_CHARS)
                    )?;
                }
                Ok(())
            }
            Observation::AgentCollaborator(collab) => {
                let title = self.paint_bold(&fill(t.collaborator_response, &collab.collaborator_name));
                writeln!(self.out, "{}", title)?;
                writeln!(self.out, "  {}{}", t.collaborator_name, collab.collaborator_name)?;
                for line in collab.text.lines() {
                    writeln!(self.out, "  {}", line)?;
                }
                Ok(())
            }
            Observation::ActionGroup(action) => {
                let title = self.paint_bold(t.tool_response);
                writeln!(self.out, "{}", title)?;
                writeln!(self.out, "  {}", action.text)
            }
            Observation::CodeInterpreter(code) => {
                let title = self.paint_bold(t.code_output);
                writeln!(self.out, "{}", title)?;
                if let Some(output) = &code.execution_output {
                    for line in output.lines() {
                        writeln!(self.out, "    {}", line)?;
                    }
                }
                if let Some(error) = &code.execution_error {
                    let line = self.paint_red(&format!("{}{}", t.code_error, error));
                    writeln!(self.out, "  {}", line)?;
                }
                if let Some(files) = &code.files {
                    writeln!(self.out, "  {}{}", t.files_generated, files.join(", "))?;
                }
                Ok(())
            }
            Observation::FinalResponse(response) => {
                let title = self.paint_bold(t.agent_response);
                writeln!(self.out, "{}", title)?;
                for line in response.text.lines() {
                    writeln!(self.out, "  {}", line)?;
                }
                Ok(())
            }
        }
    }

    fn render_totals(&mut self, usage: &UsageTotals) -> io::Result<()> {
        let t = self.text;
        writeln!(self.out)?;
        writeln!(self.out, "{}{}", t.total_input_tokens, usage.input_tokens)?;
        writeln!(self.out, "{}{}", t.total_output_tokens, usage.output_tokens)?;
        writeln!(self.out, "{}{}", t.total_llm_calls, usage.llm_calls)
    }
}

impl<W: Write> TraceObserver for ConsoleTraceRenderer<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn on_update(&mut self, update: &TraceUpdate) {
        if let Err(err) = self.render(update).and_then(|_| self.out.flush()) {
            tracing::debug!("Trace output failed: {}", err);
        }
    }
}
