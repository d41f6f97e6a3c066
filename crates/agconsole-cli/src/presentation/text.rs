use crate::args::Language;

/// User-facing trace wording for one language.
///
/// Templates mark their argument with `{}`.
#[derive(Debug)]
pub struct TraceText {
    pub choosing_collaborator: &'static str,
    pub no_matching: &'static str,
    pub continue_conversation: &'static str,
    pub use_collaborator: &'static str,
    pub intent_classifier: &'static str,
    pub using_kb: &'static str,
    pub kb_id: &'static str,
    pub query: &'static str,
    pub invoking_tool: &'static str,
    pub unknown_function: &'static str,
    pub function: &'static str,
    pub kind: &'static str,
    pub parameters: &'static str,
    pub param_name: &'static str,
    pub param_value: &'static str,
    pub code_interpreter: &'static str,
    pub kb_response: &'static str,
    pub references: &'static str,
    pub tool_response: &'static str,
    pub code_output: &'static str,
    pub code_error: &'static str,
    pub files_generated: &'static str,
    pub agent_response: &'static str,
    pub step: &'static str,
    pub sub_agent: &'static str,
    pub total_input_tokens: &'static str,
    pub total_output_tokens: &'static str,
    pub total_llm_calls: &'static str,
    pub collaborator_invoke: &'static str,
    pub collaborator_name: &'static str,
    pub collaborator_input: &'static str,
    pub collaborator_response: &'static str,
    pub degraded: &'static str,
}

const ENGLISH: TraceText = TraceText {
    choosing_collaborator: "Choosing a collaborator for this request...",
    no_matching: "No matching collaborator. Revert to 'SUPERVISOR' mode for this request.",
    continue_conversation: "Continue conversation with previous collaborator",
    use_collaborator: "Use collaborator: '{}'",
    intent_classifier: "Intent classifier took {}s",
    using_kb: "Using knowledge base",
    kb_id: "Knowledge base ID: ",
    query: "Query: ",
    invoking_tool: "Invoking Tool - ",
    unknown_function: "Unknown function",
    function: "Function: ",
    kind: "Type: ",
    parameters: "Parameters",
    param_name: "Parameter Name",
    param_value: "Parameter Value",
    code_interpreter: "Code interpreter tool usage",
    kb_response: "Knowledge Base Response",
    references: "references",
    tool_response: "Tool Response",
    code_output: "Code interpreter output",
    code_error: "Code interpretation error: ",
    files_generated: "Code interpretation files generated: ",
    agent_response: "Agent Response",
    step: "Step",
    sub_agent: "Sub-Agent",
    total_input_tokens: "Total Input Tokens: ",
    total_output_tokens: "Total Output Tokens: ",
    total_llm_calls: "Total LLM Calls: ",
    collaborator_invoke: "Invoking Collaborator - {}",
    collaborator_name: "Collaborator Name: ",
    collaborator_input: "Input Content: ",
    collaborator_response: "Collaborator Response - {}",
    degraded: "Trace frame partially unreadable: ",
};

const CHINESE: TraceText = TraceText {
    choosing_collaborator: "正在为此请求选择协作者...",
    no_matching: "没有匹配的协作者。对此请求恢复为'SUPERVISOR'模式。",
    continue_conversation: "继续与之前的协作者对话",
    use_collaborator: "使用协作者: '{}'",
    intent_classifier: "意图分类器耗时 {}秒",
    using_kb: "使用知识库",
    kb_id: "知识库 ID: ",
    query: "查询: ",
    invoking_tool: "调用工具 - ",
    unknown_function: "未知函数",
    function: "函数: ",
    kind: "类型: ",
    parameters: "参数",
    param_name: "参数名称",
    param_value: "参数值",
    code_interpreter: "代码解释器工具使用",
    kb_response: "知识库响应",
    references: "引用",
    tool_response: "工具响应",
    code_output: "代码解释器输出",
    code_error: "代码解释错误: ",
    files_generated: "生成的文件: ",
    agent_response: "Agent 响应",
    step: "步骤",
    sub_agent: "子 Agent",
    total_input_tokens: "总输入令牌数: ",
    total_output_tokens: "总输出令牌数: ",
    total_llm_calls: "总LLM调用次数: ",
    collaborator_invoke: "调用协作者 - {}",
    collaborator_name: "协作者名称: ",
    collaborator_input: "输入内容: ",
    collaborator_response: "协作者响应 - {}",
    degraded: "跟踪帧部分无法读取: ",
};

impl TraceText {
    pub fn for_language(language: Language) -> &'static TraceText {
        match language {
            Language::En => &ENGLISH,
            Language::Zh => &CHINESE,
        }
    }
}

/// Fill the `{}` slot of a template
pub fn fill(template: &str, value: &str) -> String {
    template.replacen("{}", value, 1)
}
