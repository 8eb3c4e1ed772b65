// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Parses a model turn into a tool call or a final answer

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

use super::AgentError;

pub const FINAL_ANSWER_ACTION: &str = "Final Answer:";

/// What the model decided to do this turn
#[derive(Debug, Clone, PartialEq)]
pub enum AgentStep {
    Action {
        tool: String,
        input: String,
        /// Raw model text, replayed in the scratchpad
        log: String,
    },
    Finish {
        output: String,
    },
}

#[derive(Deserialize)]
struct ActionBlob {
    action: String,
    #[serde(default)]
    action_input: Value,
}

fn fenced_json() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("action blob regex is valid")
    })
}

pub fn parse(text: &str) -> Result<AgentStep, AgentError> {
    if let Some(idx) = text.find(FINAL_ANSWER_ACTION) {
        let output = text[idx + FINAL_ANSWER_ACTION.len()..].trim().to_string();
        return Ok(AgentStep::Finish { output });
    }

    let blob = fenced_json()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .or_else(|| {
            let start = text.find('{')?;
            let end = text.rfind('}')?;
            (start < end).then(|| &text[start..=end])
        })
        .ok_or_else(|| AgentError::Parse(format!("Could not parse LLM output: {}", text)))?;

    let action: ActionBlob = serde_json::from_str(blob)
        .map_err(|e| AgentError::Parse(format!("Invalid action blob ({}): {}", e, blob)))?;

    let input = match action.action_input {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    };

    Ok(AgentStep::Action {
        tool: action.action,
        input,
        log: text.to_string(),
    })
}
