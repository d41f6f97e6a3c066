mod common;

use agconsole_runtime::BotConfig;
use agconsole_testing::TestWorld;
use common::replay_bot;

fn world() -> TestWorld {
    TestWorld::new()
        .with_bot(replay_bot("Agent Assistant", "turn.jsonl"))
        .with_bot(BotConfig::new("Planner"))
}

#[test]
fn test_bots_listing() {
    let result = world().run(&["bots"]).unwrap();
    assert!(result.success());
    insta::assert_snapshot!(result.stdout(), @r"
    * Agent Assistant  AGENT1/ALIAS1
      Planner  (Configuration incomplete: bot 'Planner' has no agent_id and no agent_name to look it up)
    ");
}

#[test]
fn test_bots_json() {
    let result = world().with_default_bot("Planner").run(&["bots", "--json"]).unwrap();
    assert!(result.success());

    let listings: serde_json::Value = serde_json::from_str(result.stdout()).unwrap();
    assert_eq!(listings[0]["bot_name"], "Agent Assistant");
    assert_eq!(listings[0]["selected"], false);
    assert_eq!(listings[0]["profile"]["agent_alias_id"], "ALIAS1");
    assert_eq!(listings[1]["selected"], true);
    assert!(listings[1].get("profile").is_none());
    assert!(listings[1]["error"].as_str().unwrap().contains("Planner"));
}

#[test]
fn test_bots_empty_config() {
    let result = TestWorld::new().run(&["bots"]).unwrap();
    assert!(result.success());
    assert!(result.stdout().starts_with("No bots configured in"));
}
