mod common;

use agconsole_runtime::BotConfig;
use agconsole_testing::TestWorld;
use agconsole_testing::events::*;
use common::replay_bot;

#[test]
fn test_chat_prints_start_prompt_and_answers_each_line() {
    let world = TestWorld::new()
        .with_recording("turn.jsonl", &[chunk("Sure.")])
        .with_bot(BotConfig {
            start_prompt: Some("How can I help?".to_string()),
            ..replay_bot("Agent Assistant", "turn.jsonl")
        });

    let result = world
        .run_with_stdin(&["chat", "--no-trace"], "first\n\nsecond\n/exit\nthird\n")
        .unwrap();
    assert!(result.success(), "stderr: {}", result.stderr());
    assert_eq!(result.stdout(), "How can I help?\nSure.\nSure.\n");
}

#[test]
fn test_chat_ends_at_end_of_input() {
    let world = TestWorld::new()
        .with_recording("turn.jsonl", &[chunk("Sure.")])
        .with_bot(replay_bot("Agent Assistant", "turn.jsonl"));

    let result = world.run_with_stdin(&["chat", "--no-trace"], "only\n").unwrap();
    assert!(result.success());
    assert_eq!(result.stdout(), "Sure.\n");
}

#[test]
fn test_chat_apologizes_and_continues_after_failed_turn() {
    let world = TestWorld::new()
        .with_file("broken.jsonl", "not json\n")
        .with_bot(replay_bot("Agent Assistant", "broken.jsonl"));

    let result = world
        .run_with_stdin(&["chat", "--no-trace"], "one\ntwo\n/quit\n")
        .unwrap();
    assert!(result.success());

    let apology = "I encountered an error processing your request. Please try again.\n";
    assert_eq!(result.stdout(), apology.repeat(2));
    assert!(result.stderr().contains("Error: Agent invocation failed"));
}

#[test]
fn test_chat_with_unresolvable_bot_fails() {
    let world = TestWorld::new().with_bot(BotConfig::new("Agent Assistant"));

    let result = world.run_with_stdin(&["chat"], "hi\n").unwrap();
    assert!(!result.success());
    assert!(result.stderr().contains("Configuration incomplete"));
}
