#![allow(dead_code)]

use agconsole_providers::RawEvent;
use agconsole_runtime::BotConfig;
use agconsole_testing::events::*;
use std::path::PathBuf;

pub const ANSWER: &str = "Let me check. \n\nReserved for 7pm.\n";

/// A routed turn: the supervisor hands the request to a collaborator
pub fn booking_turn() -> Vec<RawEvent> {
    vec![
        routing_input(),
        routing_output("<a>restaurant-agent</a>", 100, 5),
        rationale("SUPERVISOR", 1, "Delegate the booking."),
        collaborator_input("restaurant-agent", "Book a table for two"),
        chunk("Let me check. "),
        model_usage(800, 120),
        collaborator_output("restaurant-agent", "Reserved for 7pm."),
    ]
}

/// Bot with explicit ids answering from `recording`
pub fn replay_bot(name: &str, recording: &str) -> BotConfig {
    BotConfig {
        agent_id: Some("AGENT1".to_string()),
        agent_alias_id: Some("ALIAS1".to_string()),
        replay: Some(PathBuf::from(recording)),
        ..BotConfig::new(name)
    }
}
