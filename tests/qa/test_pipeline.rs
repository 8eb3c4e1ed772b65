// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Full pipeline against mocked OpenAI, Pinecone and SerpAPI endpoints

use clap::Parser;
use pdf_qa_node::config::AppConfig;
use pdf_qa_node::qa::{
    Answer, ChatHistory, QaDispatcher, SearchAgentFallbackStage, VectorStorePrimaryStage,
};
use pdf_qa_node::search::SearchService;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> AppConfig {
    let uri = server.uri();
    let uri = uri.as_str();
    AppConfig::try_parse_from([
        "pdf-qa-node",
        "--openai-api-key",
        "sk-test",
        "--openai-base-url",
        uri,
        "--pinecone-api-key",
        "pc-test",
        "--pinecone-index-name",
        "pdf-index",
        "--pinecone-index-host",
        uri,
        "--serpapi-api-key",
        "serp-test",
        "--serpapi-base-url",
        uri,
        "--upstream-timeout-ms",
        "5000",
    ])
    .unwrap()
}

fn dispatcher(config: &AppConfig) -> QaDispatcher {
    let search = Arc::new(SearchService::new(config.search_config()).unwrap());
    let primary = Arc::new(VectorStorePrimaryStage::new(config.retrieval_settings()));
    let fallback = SearchAgentFallbackStage::new(search, config.agent_settings());
    QaDispatcher::new(primary, Arc::new(fallback)).with_stage_timeout(config.stage_timeout())
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

async fn mount_retrieval(server: &MockServer, qa_reply: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [0.1, 0.2, 0.3], "index": 0}]
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [
                {"id": "p1", "score": 0.88, "metadata": {"text": "The warranty covers parts.", "source": "manual.pdf"}}
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Helpful answer in markdown"))
        .respond_with(completion(qa_reply))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_answered_from_documents() {
    let server = MockServer::start().await;
    mount_retrieval(&server, "The warranty covers parts.").await;

    let answer = dispatcher(&config(&server))
        .answer("What does the warranty cover?", &ChatHistory::default())
        .await
        .unwrap();

    match answer {
        Answer::Retrieval { text, sources } => {
            assert_eq!(text, "The warranty covers parts.");
            assert_eq!(sources.len(), 1);
            assert_eq!(sources[0].metadata["source"], "manual.pdf");
        }
        other => panic!("expected a retrieval answer, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_goes_to_web_search() {
    let server = MockServer::start().await;
    mount_retrieval(&server, "ANSWER NOT FOUND").await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("api_key", "serp-test"))
        .and(query_param("location", "Austin,Texas,United States"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": [
                {"title": "Weather", "link": "https://weather.example", "snippet": "Sunny and warm"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    // Second agent turn: the observation is in the prompt
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Observation: Weather: Sunny and warm"))
        .respond_with(completion(
            "Thought: I now know the final answer\nFinal Answer: Based on our conversation and Google search, it is sunny.",
        ))
        .mount(&server)
        .await;
    // First agent turn
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("action_input"))
        .respond_with(completion(
            "Thought: search\nAction:\n```\n{\"action\": \"search\", \"action_input\": \"weather in Austin\"}\n```",
        ))
        .mount(&server)
        .await;

    let answer = dispatcher(&config(&server))
        .answer("What's the weather like?", &ChatHistory::default())
        .await
        .unwrap();

    assert_eq!(
        answer,
        Answer::Search {
            text: "Based on our conversation and Google search, it is sunny.".to_string()
        }
    );
}

#[tokio::test]
async fn test_missing_index_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/pdf-index"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut config = config(&server);
    config.pinecone_index_host = None;
    config.pinecone_controller_url = server.uri();

    let err = dispatcher(&config)
        .answer("q", &ChatHistory::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Index not found: pdf-index");
}
