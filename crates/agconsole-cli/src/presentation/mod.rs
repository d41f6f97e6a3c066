pub mod format;
pub mod text;
pub mod trace_renderer;

pub use text::TraceText;
pub use trace_renderer::ConsoleTraceRenderer;
