// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat-agent prompt assembly

use std::sync::Arc;

use super::tool::Tool;
use crate::qa::ChatHistory;

/// Prefix the search agent is asked to open its final answer with
pub const DISCLOSURE_PREFIX: &str = "Based on our conversation and Google search, ";

const PREFIX: &str = "Answer the following questions as best you can. \
You have access to the following tools:";

const FORMAT_INSTRUCTIONS: &str = r#"The way you use the tools is by specifying a json blob, denoted below by $JSON_BLOB
Specifically, this $JSON_BLOB should have a "action" key (with the name of the tool to use) and a "action_input" key (with the input to the tool going here).
The $JSON_BLOB should only contain a SINGLE action, do NOT return a list of multiple actions. Here is an example of a valid $JSON_BLOB:

```
{
  "action": "search",
  "action_input": "current weather in Austin"
}
```

ALWAYS use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action:
```
$JSON_BLOB
```
Observation: the result of the action
... (this Thought/Action/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question"#;

const SUFFIX: &str = "Begin! Reminder to always use the exact characters `Final Answer` when responding.";

/// Conversation framing plus the disclosure instruction
pub fn conversation_preamble(history: &ChatHistory) -> String {
    format!(
        "The following is a friendly conversation between a human and an AI.\n\
         {}\n\
         The AI is talkative and provides lots of specific details from its context.\n\
         If the AI does not know the answer to a question, it truthfully says it does not know.\n\
         Always start your answer with: \"{}\"",
        history.to_prompt_string(),
        DISCLOSURE_PREFIX
    )
}

/// Full system message for one agent run
pub fn system_prompt(tools: &[Arc<dyn Tool>], history: &ChatHistory) -> String {
    let tool_lines = tools
        .iter()
        .map(|t| format!("{}: {}", t.name(), t.description()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{PREFIX}\n{tool_lines}\n\n{FORMAT_INSTRUCTIONS}\n\n{}\n\n{SUFFIX}",
        conversation_preamble(history)
    )
}

/// User turn: the question followed by the scratchpad so far
pub fn user_prompt(input: &str, scratchpad: &str) -> String {
    if scratchpad.is_empty() {
        format!("Question: {input}")
    } else {
        format!("Question: {input}\n\n{scratchpad}")
    }
}
