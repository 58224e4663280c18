use precis_common::{LlmConfig, PrecisError};
use precis_llm::ollama::OllamaClient;
use precis_llm::openai::OpenAiClient;
use precis_llm::traits::LlmClient;
use precis_llm::{ensure_llm_ready, llm_abstract};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "gen-1",
        "model": "test-model",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    })
}

#[tokio::test]
async fn openai_posts_chat_completions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [
                { "role": "system", "content": "be brief" },
                { "role": "user", "content": "hello" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hi.")))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/v1", server.uri());
    let client = OpenAiClient::new("sk-test".into(), "test-model".into(), Some(&base)).unwrap();
    let resp = client
        .generate("hello", Some("be brief"), None, None)
        .await
        .unwrap();
    assert_eq!(resp.text, "Hi.");
    assert_eq!(resp.tokens_used, Some(15));
    assert_eq!(client.model_name(), "test-model");
}

#[tokio::test]
async fn openai_api_errors_become_llm_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": { "message": "invalid api key" } })),
        )
        .mount(&server)
        .await;

    let client = OpenAiClient::new("bad".into(), "m".into(), Some(&server.uri())).unwrap();
    let err = client.generate("hi", None, None, None).await.unwrap_err();
    match err {
        PrecisError::Llm(msg) => assert!(msg.contains("invalid api key")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn llm_abstract_issues_both_prompts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(|req: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
            let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
            let reply = if prompt.starts_with("Write an abstract") {
                "Glaciers are retreating fast."
            } else {
                "*glaciers\n *meltwater\n *survey\n"
            };
            ResponseTemplate::new(200).set_body_json(completion(reply))
        })
        .expect(2)
        .mount(&server)
        .await;

    let client = OpenAiClient::new("k".into(), "m".into(), Some(&server.uri())).unwrap();
    let result = llm_abstract(&client, "Glacier article text.", 2).await.unwrap();
    assert_eq!(result.classic_abstract, "Glaciers are retreating fast.");
    assert_eq!(result.keyword_abstract, vec!["glaciers", "meltwater", "survey"]);
}

#[tokio::test]
async fn ollama_generates_when_model_is_present() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "models": [{ "name": "llama3.2:3b" }] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "llama3.2:3b", "stream": false })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "response": "Local answer", "eval_count": 7 })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/pull"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = OllamaClient::new(format!("{}/", server.uri()), "llama3.2:3b".into())
        .await
        .unwrap();
    let resp = client.generate("hi", None, Some(20), Some(0.2)).await.unwrap();
    assert_eq!(resp.text, "Local answer");
    assert_eq!(resp.tokens_used, Some(7));
    assert!(client.health_check().await.unwrap());
}

#[tokio::test]
async fn ollama_pulls_missing_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/pull"))
        .and(body_partial_json(json!({ "model": "tiny" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(1)
        .mount(&server)
        .await;

    OllamaClient::new(server.uri(), "tiny".into()).await.unwrap();
}

#[tokio::test]
async fn ensure_llm_ready_rejects_missing_provider() {
    assert!(matches!(
        ensure_llm_ready(&LlmConfig::None).await,
        Err(PrecisError::Config(_))
    ));
    let empty_key = LlmConfig::OpenAi {
        api_key: "  ".into(),
        model: "m".into(),
        base_url: None,
    };
    assert!(matches!(
        ensure_llm_ready(&empty_key).await,
        Err(PrecisError::Config(_))
    ));
}
