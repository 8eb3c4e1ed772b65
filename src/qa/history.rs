// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Conversation history supplied by the caller
//!
//! History is never validated for shape. Whatever JSON the client sends is
//! read leniently into turns and anything unrecognised is dropped.

use serde::Serialize;
use serde_json::Value;

use crate::llm::ChatMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Human,
    Ai,
}

/// One prior turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatTurn {
    pub fn human(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Human,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Ai,
            text: text.into(),
        }
    }
}

/// Ordered prior turns, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    pub fn new(turns: Vec<ChatTurn>) -> Self {
        Self { turns }
    }

    /// Read history from a request body value
    ///
    /// Accepted entries: `[question, answer]` pairs, `{role, content}` (or
    /// `text`/`message`) objects, and bare strings, which alternate between
    /// human and AI. A missing or non-array value yields an empty history.
    pub fn from_json(value: Option<&Value>) -> Self {
        let entries = match value {
            Some(Value::Array(entries)) => entries,
            _ => return Self::default(),
        };

        let mut turns: Vec<ChatTurn> = Vec::new();
        for entry in entries {
            match entry {
                Value::Array(pair) => {
                    let mut speaker = Speaker::Human;
                    for part in pair.iter().take(2) {
                        if let Some(text) = part.as_str() {
                            turns.push(ChatTurn {
                                speaker,
                                text: text.to_string(),
                            });
                        }
                        speaker = Speaker::Ai;
                    }
                }
                Value::Object(obj) => {
                    let speaker = obj
                        .get("role")
                        .or_else(|| obj.get("type"))
                        .and_then(Value::as_str)
                        .and_then(speaker_for_role);
                    let text = obj
                        .get("content")
                        .or_else(|| obj.get("text"))
                        .or_else(|| obj.get("message"))
                        .and_then(Value::as_str);
                    if let (Some(speaker), Some(text)) = (speaker, text) {
                        turns.push(ChatTurn {
                            speaker,
                            text: text.to_string(),
                        });
                    }
                }
                Value::String(text) => {
                    let speaker = match turns.last() {
                        Some(turn) if turn.speaker == Speaker::Human => Speaker::Ai,
                        _ => Speaker::Human,
                    };
                    turns.push(ChatTurn {
                        speaker,
                        text: text.clone(),
                    });
                }
                _ => {}
            }
        }

        Self { turns }
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// `Human: ...` / `Assistant: ...` lines for prompt templates
    pub fn to_prompt_string(&self) -> String {
        self.turns
            .iter()
            .map(|turn| match turn.speaker {
                Speaker::Human => format!("Human: {}", turn.text),
                Speaker::Ai => format!("Assistant: {}", turn.text),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_messages(&self) -> Vec<ChatMessage> {
        self.turns
            .iter()
            .map(|turn| match turn.speaker {
                Speaker::Human => ChatMessage::user(turn.text.clone()),
                Speaker::Ai => ChatMessage::assistant(turn.text.clone()),
            })
            .collect()
    }
}

fn speaker_for_role(role: &str) -> Option<Speaker> {
    match role.to_ascii_lowercase().as_str() {
        "user" | "human" | "usermessage" => Some(Speaker::Human),
        "assistant" | "ai" | "bot" | "apimessage" => Some(Speaker::Ai),
        _ => None,
    }
}
