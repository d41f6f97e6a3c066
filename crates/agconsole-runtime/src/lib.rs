pub mod config;
pub mod conversation;
pub mod directory;
pub mod error;
pub mod invoker;
pub mod observer;
pub mod resolver;
pub mod tasks;
pub mod turn;

pub use config::{AliasConfig, BotConfig, Config, DEFAULT_BOT_NAME, resolve_workspace_path};
pub use conversation::Conversation;
pub use directory::StaticDirectory;
pub use error::{Error, Result};
pub use invoker::{AgentInvoker, EventStream, InvocationRequest, ReplayInvoker, SessionState};
pub use observer::{CollectingObserver, TraceObserver};
pub use resolver::{AgentCatalog, AliasSummary, BotProfileResolver, StaticCatalog, latest_alias};
pub use tasks::{TaskDefinition, TaskFile, compose_input};
pub use turn::{TurnStream, invoke};
