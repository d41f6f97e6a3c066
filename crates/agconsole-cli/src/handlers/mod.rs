mod context;

pub mod ask;
pub mod bots;
pub mod chat;
pub mod replay;

pub use context::{BotSession, HandlerContext, drain};
