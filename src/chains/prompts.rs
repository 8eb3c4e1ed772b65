// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt templates for the conversational retrieval chain

use crate::qa::SENTINEL;

/// Rewrite a follow-up question into a standalone one
pub fn condense_question_prompt(chat_history: &str, question: &str) -> String {
    format!(
        "Given the following conversation and a follow up question, rephrase the follow up \
         question to be a standalone question.\n\n\
         Chat History:\n{chat_history}\n\
         Follow Up Input: {question}\n\
         Standalone question:"
    )
}

/// Answer from retrieved context, or emit the not-found marker
pub fn qa_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a helpful AI assistant. Use the following pieces of context to answer the \
         question at the end.\n\
         If the answer is not contained in the context, reply with exactly \"{SENTINEL}\" and \
         nothing else. DO NOT try to make up an answer.\n\n\
         {context}\n\n\
         Question: {question}\n\
         Helpful answer in markdown:"
    )
}
