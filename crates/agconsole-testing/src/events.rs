//! Builders for raw event records as the agent-invocation service sends them.

use agconsole_providers::RawEvent;
use serde_json::{Value, json};

fn event(value: Value) -> RawEvent {
    RawEvent::from_value(value).expect("builder produced an invalid event record")
}

/// Wrap an inner trace into a `trace` record
pub fn trace(agent_id: Option<&str>, caller_chain_len: usize, inner: Value) -> RawEvent {
    let chain: Vec<Value> = (0..caller_chain_len)
        .map(|i| json!({"agentAliasArn": format!("arn:aws:bedrock:us-east-1:000000000000:agent-alias/AGENT{}/ALIAS{}", i, i)}))
        .collect();

    let mut envelope = json!({
        "callerChain": chain,
        "trace": inner,
    });
    if let Some(id) = agent_id {
        envelope["agentId"] = json!(id);
    }
    event(json!({"trace": envelope}))
}

fn orchestration(inner: Value) -> RawEvent {
    trace(Some("SUPERVISOR"), 1, json!({"orchestrationTrace": inner}))
}

fn usage_metadata(input_tokens: u32, output_tokens: u32) -> Value {
    json!({"usage": {"inputTokens": input_tokens, "outputTokens": output_tokens}})
}

pub fn chunk(text: &str) -> RawEvent {
    event(json!({"chunk": {"bytes": text}}))
}

pub fn routing_input() -> RawEvent {
    trace(
        Some("SUPERVISOR"),
        1,
        json!({"routingClassifierTrace": {"modelInvocationInput": {"text": "classify", "type": "ROUTING_CLASSIFIER"}}}),
    )
}

/// Routing classifier answer; `text` is the raw model text, e.g. `<a>name</a>`
pub fn routing_output(text: &str, input_tokens: u32, output_tokens: u32) -> RawEvent {
    let content = json!({"content": [{"type": "text", "text": text}]}).to_string();
    trace(
        Some("SUPERVISOR"),
        1,
        json!({
            "routingClassifierTrace": {
                "modelInvocationOutput": {
                    "rawResponse": {"content": content},
                    "metadata": usage_metadata(input_tokens, output_tokens),
                }
            }
        }),
    )
}

pub fn model_usage(input_tokens: u32, output_tokens: u32) -> RawEvent {
    orchestration(json!({
        "modelInvocationOutput": {"metadata": usage_metadata(input_tokens, output_tokens)}
    }))
}

pub fn rationale(agent_id: &str, caller_chain_len: usize, text: &str) -> RawEvent {
    trace(
        Some(agent_id),
        caller_chain_len,
        json!({"orchestrationTrace": {"rationale": {"text": text}}}),
    )
}

pub fn knowledge_base_input(knowledge_base_id: &str, text: &str) -> RawEvent {
    orchestration(json!({
        "invocationInput": {
            "invocationType": "KNOWLEDGE_BASE",
            "knowledgeBaseLookupInput": {"knowledgeBaseId": knowledge_base_id, "text": text}
        }
    }))
}

pub fn collaborator_input(collaborator_name: &str, text: &str) -> RawEvent {
    orchestration(json!({
        "invocationInput": {
            "invocationType": "AGENT_COLLABORATOR",
            "agentCollaboratorInvocationInput": {
                "agentCollaboratorName": collaborator_name,
                "input": {"text": text, "type": "TEXT"}
            }
        }
    }))
}

pub fn action_input(function: Option<&str>, parameters: &[(&str, &str)]) -> RawEvent {
    let params: Vec<Value> = parameters
        .iter()
        .map(|(name, value)| json!({"name": name, "type": "string", "value": value}))
        .collect();

    let mut input = json!({"executionType": "LAMBDA", "parameters": params});
    if let Some(function) = function {
        input["function"] = json!(function);
    }

    orchestration(json!({
        "invocationInput": {
            "invocationType": "ACTION_GROUP",
            "actionGroupInvocationInput": input
        }
    }))
}

pub fn code_input(code: &str) -> RawEvent {
    orchestration(json!({
        "invocationInput": {
            "invocationType": "ACTION_GROUP_CODE_INTERPRETER",
            "codeInterpreterInvocationInput": {"code": code}
        }
    }))
}

pub fn knowledge_base_output(references: &[&str]) -> RawEvent {
    let refs: Vec<Value> = references
        .iter()
        .map(|text| json!({"content": {"text": text}, "location": {"type": "S3"}}))
        .collect();

    orchestration(json!({
        "observation": {
            "type": "KNOWLEDGE_BASE",
            "knowledgeBaseLookupOutput": {"retrievedReferences": refs}
        }
    }))
}

pub fn collaborator_output(collaborator_name: &str, text: &str) -> RawEvent {
    orchestration(json!({
        "observation": {
            "type": "AGENT_COLLABORATOR",
            "agentCollaboratorInvocationOutput": {
                "agentCollaboratorName": collaborator_name,
                "output": {"text": text, "type": "TEXT"}
            }
        }
    }))
}

pub fn action_output(text: &str) -> RawEvent {
    orchestration(json!({
        "observation": {
            "type": "ACTION_GROUP",
            "actionGroupInvocationOutput": {"text": text}
        }
    }))
}

pub fn code_output(
    execution_output: Option<&str>,
    execution_error: Option<&str>,
    files: Option<&[&str]>,
) -> RawEvent {
    let mut output = json!({});
    if let Some(stdout) = execution_output {
        output["executionOutput"] = json!(stdout);
    }
    if let Some(error) = execution_error {
        output["executionError"] = json!(error);
    }
    if let Some(files) = files {
        output["files"] = json!(files);
    }

    orchestration(json!({
        "observation": {
            "type": "ACTION_GROUP_CODE_INTERPRETER",
            "codeInterpreterInvocationOutput": output
        }
    }))
}

pub fn final_response(text: &str) -> RawEvent {
    orchestration(json!({
        "observation": {"type": "FINISH", "finalResponse": {"text": text}}
    }))
}

/// Serialize events as a JSONL recording
pub fn to_jsonl(events: &[RawEvent]) -> String {
    events
        .iter()
        .map(|event| serde_json::to_string(event).expect("event records serialize"))
        .map(|line| line + "\n")
        .collect()
}
