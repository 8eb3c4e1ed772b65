// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Agent loop: think, call a tool, observe, repeat

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::output_parser::{parse, AgentStep};
use super::prompt::{system_prompt, user_prompt};
use super::tool::Tool;
use super::AgentError;
use crate::llm::{ChatMessage, LanguageModel};
use crate::qa::ChatHistory;

pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Returned when the iteration cap is hit before a final answer
pub const MAX_ITERATIONS_OUTPUT: &str = "Agent stopped due to max iterations.";

const OBSERVATION: &str = "Observation:";

pub struct AgentExecutor {
    llm: Arc<dyn LanguageModel>,
    tools: Vec<Arc<dyn Tool>>,
    max_iterations: usize,
}

impl AgentExecutor {
    pub fn new(llm: Arc<dyn LanguageModel>, tools: Vec<Arc<dyn Tool>>) -> Self {
        Self {
            llm,
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Run the agent on `input` and return its final answer text
    pub async fn run(&self, input: &str, history: &ChatHistory) -> Result<String, AgentError> {
        let system = ChatMessage::system(system_prompt(&self.tools, history));
        let stop = vec![OBSERVATION.to_string()];
        let mut scratchpad = String::new();

        for iteration in 1..=self.max_iterations {
            let messages = [system.clone(), ChatMessage::user(user_prompt(input, &scratchpad))];
            let text = self.llm.complete(&messages, &stop).await?;

            match parse(&text)? {
                AgentStep::Finish { output } => {
                    info!("Agent finished after {} iteration(s)", iteration);
                    return Ok(output);
                }
                AgentStep::Action { tool, input: tool_input, log } => {
                    debug!("Agent iteration {}: {}({})", iteration, tool, tool_input);
                    let observation = match self.tools.iter().find(|t| t.name() == tool) {
                        Some(t) => t.call(&tool_input).await?,
                        None => {
                            warn!("Agent picked unknown tool {}", tool);
                            format!("{} is not a valid tool, try another one.", tool)
                        }
                    };
                    scratchpad.push_str(log.trim_end());
                    scratchpad.push_str(&format!("\n{} {}\nThought:", OBSERVATION, observation));
                    scratchpad.push('\n');
                }
            }
        }

        warn!("Agent hit max iterations ({})", self.max_iterations);
        Ok(MAX_ITERATIONS_OUTPUT.to_string())
    }
}
