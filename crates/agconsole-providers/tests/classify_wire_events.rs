use agconsole_providers::{ClassifierContext, RawEvent, classify, read_recording};
use agconsole_testing::events::*;
use agconsole_types::*;
use chrono::Utc;

fn classify_one(event: &RawEvent) -> Vec<StreamEvent> {
    let ctx = ClassifierContext {
        active_agent: " ",
        routing_started_at: Some(Utc::now()),
        now: Utc::now(),
    };
    let out = classify(event, &ctx);
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    out.events
}

#[test]
fn invocation_inputs_split_by_kind() -> anyhow::Result<()> {
    let kinds: Vec<&'static str> = [
        knowledge_base_input("KB1", "opening hours"),
        collaborator_input("restaurant-agent", "Book a table"),
        action_input(Some("book_table"), &[("guests", "2")]),
        code_input("print(42)"),
    ]
    .iter()
    .flat_map(classify_one)
    .map(|event| match event {
        StreamEvent::OrchestrationInput(input) => input.kind(),
        other => panic!("unexpected event {:?}", other),
    })
    .collect();

    assert_eq!(
        kinds,
        vec![
            "knowledge_base_lookup_input",
            "agent_collaborator_invocation_input",
            "action_group_invocation_input",
            "code_interpreter_invocation_input"
        ]
    );
    Ok(())
}

#[test]
fn action_without_function_uses_sentinel() {
    let events = classify_one(&action_input(None, &[("b", "2"), ("a", "1")]));
    match &events[..] {
        [StreamEvent::OrchestrationInput(InvocationInput::ActionGroup(action))] => {
            assert_eq!(action.function, UNKNOWN_FUNCTION);
            assert_eq!(action.execution_type.as_deref(), Some("LAMBDA"));
            let names: Vec<&str> = action
                .parameters
                .as_ref()
                .unwrap()
                .iter()
                .map(|p| p.name.as_str())
                .collect();
            assert_eq!(names, vec!["b", "a"]);
        }
        other => panic!("unexpected events {:?}", other),
    }
}

#[test]
fn observations_split_by_kind() {
    let kinds: Vec<&'static str> = [
        knowledge_base_output(&["Open 5pm to 11pm"]),
        collaborator_output("restaurant-agent", "Booked."),
        action_output("ok"),
        code_output(Some("42"), None, Some(&["plot.png"])),
        final_response("All done."),
    ]
    .iter()
    .flat_map(classify_one)
    .map(|event| match event {
        StreamEvent::OrchestrationObservation(observation) => observation.kind(),
        other => panic!("unexpected event {:?}", other),
    })
    .collect();

    assert_eq!(
        kinds,
        vec![
            "knowledge_base_lookup_output",
            "agent_collaborator_invocation_output",
            "action_group_invocation_output",
            "code_interpreter_invocation_output",
            "final_response"
        ]
    );
}

#[test]
fn nested_rationale_keeps_caller_chain() {
    let events = classify_one(&rationale("REST", 2, "Checking availability"));
    match &events[..] {
        [StreamEvent::OrchestrationRationale(r)] => {
            assert_eq!(r.agent_id.as_deref(), Some("REST"));
            assert_eq!(r.caller_chain.len(), 2);
            assert!(r.is_nested());
            assert_eq!(r.text, "Checking availability");
        }
        other => panic!("unexpected events {:?}", other),
    }
}

#[test]
fn recording_round_trips_through_jsonl() -> anyhow::Result<()> {
    let dir = std::env::temp_dir().join(format!("agconsole-providers-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("turn.jsonl");

    let events = vec![routing_input(), chunk("Hello"), model_usage(10, 2)];
    std::fs::write(&path, to_jsonl(&events))?;

    let read: Vec<RawEvent> = read_recording(&path)?.collect::<std::result::Result<_, _>>()?;
    assert_eq!(read, events);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn action_input_normalized_shape() {
    let events = classify_one(&action_input(
        Some("book_table"),
        &[("guests", "2"), ("time", "7pm")],
    ));

    insta::assert_json_snapshot!(events, @r#"
    [
      {
        "type": "orchestration_input",
        "content": {
          "kind": "action_group",
          "function": "book_table",
          "execution_type": "LAMBDA",
          "parameters": [
            {
              "name": "guests",
              "value": "2"
            },
            {
              "name": "time",
              "value": "7pm"
            }
          ]
        }
      }
    ]
    "#);
}
