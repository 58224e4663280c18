use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use precis_common::{PrecisError, Result as PrecisResult};
use precis_core::{ExtractorConfig, LanguageResources, SentenceExtractor};
use precis_llm::traits::{LlmClient, LlmResponse};
use precis_server::{build_router, ServerState};
use precis_web::PageFetcher;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

const ARTICLE_URL: &str = "https://news.example/glaciers";
const EMPTY_URL: &str = "https://news.example/empty";

const ARTICLE_HTML: &str = r#"<html><head><title>Glaciers</title></head><body>
<p>Glaciers in the northern mountains have lost a third of their volume since the survey began. Researchers measured the glaciers every summer using drones and ground stations.</p>
<p>Photo: a researcher</p>
<p>Meltwater from the glaciers feeds rivers that supply farms across the valley. Farmers report that the rivers now peak earlier in the spring than they did before.</p>
<p>The survey team plans to publish detailed glacier maps for every valley next year.</p>
</body></html>"#;

struct StubFetcher {
    pages: HashMap<String, String>,
}

#[async_trait::async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> anyhow::Result<String> {
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("server returned error 404 for {url}"))
    }
}

struct StubLlm {
    fail: bool,
}

#[async_trait::async_trait]
impl LlmClient for StubLlm {
    async fn generate(
        &self,
        prompt: &str,
        _system_prompt: Option<&str>,
        _max_tokens: Option<u32>,
        _temperature: Option<f32>,
    ) -> PrecisResult<LlmResponse> {
        if self.fail {
            return Err(PrecisError::Llm("quota exceeded".into()));
        }
        let text = if prompt.starts_with("Write an abstract") {
            "Glaciers are shrinking and rivers peak earlier."
        } else {
            "*glaciers\n *rivers\n"
        };
        Ok(LlmResponse {
            text: text.into(),
            model: Some("stub".into()),
            tokens_used: None,
        })
    }

    async fn health_check(&self) -> PrecisResult<bool> {
        Ok(true)
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

fn state(output: &TempDir) -> ServerState {
    let pages = HashMap::from([
        (ARTICLE_URL.to_string(), ARTICLE_HTML.to_string()),
        (
            EMPTY_URL.to_string(),
            "<html><body><p>Short.</p><div>No paragraphs here at all, only a div.</div></body></html>"
                .to_string(),
        ),
    ]);
    let extractor = SentenceExtractor::new(
        Arc::new(LanguageResources::load()),
        ExtractorConfig::default(),
    );
    ServerState::new(
        extractor,
        Arc::new(StubFetcher { pages }),
        output.path().join("var"),
    )
}

fn app(state: ServerState) -> Router {
    build_router(Arc::new(state))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn create_abstract_without_llm() {
    let tmp = TempDir::new().unwrap();
    let (status, body) = send(
        app(state(&tmp)),
        get(&format!("/api/create-abstract?url={ARTICLE_URL}&abstract_size=2")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], ARTICLE_URL);
    assert!(body["neural_network"].is_null());

    let extraction = &body["sentence_extraction"];
    assert_eq!(extraction["language"], "english");
    let classic = extraction["classic_abstract"].as_str().unwrap();
    assert!(!classic.is_empty());
    assert!(!classic.contains("Photo"));
    let keywords = extraction["keyword_abstract"].as_array().unwrap();
    assert!(!keywords.is_empty() && keywords.len() <= 15);
}

#[tokio::test]
async fn create_abstract_with_llm() {
    let tmp = TempDir::new().unwrap();
    let state = state(&tmp).with_llm(Arc::new(StubLlm { fail: false }));
    let (status, body) = send(
        app(state),
        get(&format!("/api/create-abstract?url={ARTICLE_URL}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["neural_network"],
        json!({
            "classic_abstract": "Glaciers are shrinking and rivers peak earlier.",
            "keyword_abstract": ["glaciers", "rivers"]
        })
    );
    assert!(body["sentence_extraction"]["classic_abstract"].is_string());
}

#[tokio::test]
async fn llm_failure_is_bad_gateway() {
    let tmp = TempDir::new().unwrap();
    let state = state(&tmp).with_llm(Arc::new(StubLlm { fail: true }));
    let (status, body) = send(
        app(state),
        get(&format!("/api/create-abstract?url={ARTICLE_URL}")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "LLM_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("quota exceeded"));
}

#[tokio::test]
async fn page_without_usable_text_is_too_short() {
    let tmp = TempDir::new().unwrap();
    let state = state(&tmp).with_llm(Arc::new(StubLlm { fail: false }));
    let (status, body) = send(
        app(state),
        get(&format!("/api/create-abstract?url={EMPTY_URL}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentence_extraction"], json!({ "too_short": true }));
    assert!(body["neural_network"].is_null());
}

#[tokio::test]
async fn bad_requests() {
    let tmp = TempDir::new().unwrap();
    let cases = [
        ("/api/create-abstract", "BAD_REQUEST"),
        ("/api/create-abstract?url=ftp://files.example/a", "BAD_REQUEST"),
        ("/api/create-abstract?url=not-a-url", "BAD_REQUEST"),
        (
            "/api/create-abstract?url=https://news.example/glaciers&abstract_size=-1",
            "INVALID_CONFIG",
        ),
        (
            "/api/create-abstract?url=https://news.example/glaciers&abstract_size=ten",
            "BAD_REQUEST",
        ),
    ];
    for (uri, code) in cases {
        let (status, body) = send(app(state(&tmp)), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], code, "{uri}");
    }
}

#[tokio::test]
async fn fetch_failure_is_bad_gateway() {
    let tmp = TempDir::new().unwrap();
    let (status, body) = send(
        app(state(&tmp)),
        get("/api/create-abstract?url=https://news.example/missing"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "FETCH_ERROR");
}

#[tokio::test]
async fn save_writes_pretty_json() {
    let tmp = TempDir::new().unwrap();
    let results = json!({
        "url": ARTICLE_URL,
        "sentence_extraction": { "classic_abstract": "Los glaciares retroceden.", "keyword_abstract": ["glaciares"] }
    });
    let (status, body) = send(
        app(state(&tmp)),
        post_json("/api/save?filename=glaciers", &results),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(true));

    let written = std::fs::read_to_string(tmp.path().join("var/glaciers.json")).unwrap();
    assert!(written.contains("\n  \"url\""));
    assert!(written.contains("Los glaciares retroceden."));
    let parsed: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed, results);
}

#[tokio::test]
async fn save_keeps_non_ascii() {
    let tmp = TempDir::new().unwrap();
    let results = json!({ "classic_abstract": "Año de glaciares" });
    let (status, _) = send(
        app(state(&tmp)),
        post_json("/api/save?filename=a%C3%B1o", &results),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let written = std::fs::read_to_string(tmp.path().join("var/año.json")).unwrap();
    assert!(written.contains("Año de glaciares"));
}

#[tokio::test]
async fn save_rejects_unsafe_names() {
    let tmp = TempDir::new().unwrap();
    for name in ["..%2Fescape", "a%2Fb", "", "%2E%2E"] {
        let (status, body) = send(
            app(state(&tmp)),
            post_json(&format!("/api/save?filename={name}"), &json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{name}");
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
    assert!(!tmp.path().join("escape.json").exists());
}

#[tokio::test]
async fn save_rejects_invalid_json() {
    let tmp = TempDir::new().unwrap();
    let req = Request::builder()
        .method("POST")
        .uri("/api/save?filename=x")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(state(&tmp)), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let tmp = TempDir::new().unwrap();
    let (status, body) = send(app(state(&tmp)), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());

    let (status, body) = send(app(state(&tmp)), get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
