use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use hr_core::PresetRegistry;
use serde_json::Value;
use tower::ServiceExt;

use crate::error::JSON_UTF8;
use crate::{create_app, AppState, DeploymentInfo, ServerConfig};

async fn app() -> Router {
    create_app(AppState::default()).await
}

async fn send(app: Router, method: Method, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn assert_json_headers(response: &Response) {
    assert_eq!(response.headers()[header::CONTENT_TYPE], JSON_UTF8);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_get_news() {
    let response = send(app().await, Method::GET, "/api").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_json_headers(&response);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["news_count"], 100);

    let stats = &body["stats"];
    let total_views = stats["total_views"].as_u64().unwrap();
    assert_eq!(stats["avg_views"].as_u64().unwrap(), total_views / 100);
    assert!(stats["current_news"].as_u64().unwrap() <= 100);
    assert_eq!(stats["top_category"], "Entrevistas");
    assert_eq!(stats["top_source"], "Portal Carreira");

    let top = body["top_5_news"].as_array().unwrap();
    assert_eq!(top.len(), 5);
    for (i, item) in top.iter().enumerate() {
        let fields = item.as_object().unwrap();
        assert_eq!(fields.len(), 6);
        assert_eq!(item["rank"].as_u64().unwrap(), i as u64 + 1);
        for key in ["rank", "title", "source", "date", "views", "category"] {
            assert!(fields.contains_key(key), "missing {}", key);
        }
    }
}

#[tokio::test]
async fn test_get_news_with_preset() {
    let response = send(app().await, Method::GET, "/api?preset=hr-trends").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["stats"]["top_source"], "Portal RH Brasil");
    let title = body["top_5_news"][0]["title"].as_str().unwrap();
    assert!(title.contains("Tendências que dominarão"));
}

#[tokio::test]
async fn test_unknown_preset_is_bad_request() {
    let response = send(app().await, Method::GET, "/api?preset=nope").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_json_headers(&response);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("unknown preset"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_repeated_preset_key_is_json_bad_request() {
    let response = send(app().await, Method::GET, "/api?preset=careers&preset=hr-trends").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_json_headers(&response);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("preset"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_seeded_server_is_repeatable() {
    let state = AppState::new(
        PresetRegistry::default(),
        ServerConfig {
            seed: Some(1234),
            ..ServerConfig::default()
        },
    );
    let app = create_app(state).await;

    let first = json_body(send(app.clone(), Method::GET, "/api").await).await;
    let second = json_body(send(app, Method::GET, "/api").await).await;
    assert_eq!(first["stats"], second["stats"]);
    assert_eq!(first["top_5_news"], second["top_5_news"]);
}

#[tokio::test]
async fn test_options_preflight() {
    for uri in ["/api", "/api/test", "/somewhere/else"] {
        let response = send(app().await, Method::OPTIONS, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("GET") && methods.contains("OPTIONS"));
        assert_eq!(response.headers()[header::CONTENT_TYPE], JSON_UTF8);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }
}

#[tokio::test]
async fn test_method_not_allowed() {
    for (method, uri) in [
        (Method::DELETE, "/api"),
        (Method::POST, "/api"),
        (Method::PUT, "/api/test"),
        (Method::POST, "/api/deployment-diagnostics"),
    ] {
        let response = send(app().await, method, uri).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_json_headers(&response);

        let body = json_body(response).await;
        assert_eq!(body["error"], "Method not allowed");
        let allowed: Vec<&str> = body["allowedMethods"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(allowed.contains(&"GET"));
        assert!(allowed.contains(&"OPTIONS"));
    }
}

#[tokio::test]
async fn test_api_test_endpoint() {
    let response = send(app().await, Method::GET, "/api/test").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_json_headers(&response);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["endpoints"]["/api"].is_string());
    assert_eq!(body["presets"], serde_json::json!(["careers", "hr-trends"]));
}

#[tokio::test]
async fn test_deployment_diagnostics() {
    let state = AppState::new(
        PresetRegistry::default(),
        ServerConfig {
            deployment: DeploymentInfo {
                app_env: Some("production".to_string()),
                ..DeploymentInfo::default()
            },
            ..ServerConfig::default()
        },
    );
    let request = Request::builder()
        .uri("/api/deployment-diagnostics?check=1")
        .header("x-trace-tag", "yes")
        .body(Body::empty())
        .unwrap();
    let response = create_app(state).await.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["api_status"], "working");
    assert_eq!(body["environment"]["app_env"], "production");
    assert_eq!(body["environment"]["deploy_url"], "not set");
    assert_eq!(body["request"]["method"], "GET");
    assert_eq!(body["request"]["url"], "/api/deployment-diagnostics?check=1");
    assert_eq!(body["request"]["query"]["check"], "1");
    assert_eq!(body["request"]["headers"]["x-trace-tag"], "yes");
}

#[tokio::test]
async fn test_health() {
    let response = send(app().await, Method::GET, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_unknown_path_without_static_dir() {
    let response = send(app().await, Method::GET, "/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_json_headers(&response);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_static_dir_fallback() {
    let dir = std::env::temp_dir().join(format!("hr_web_static_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>HR News</h1>").unwrap();

    let state = AppState::new(
        PresetRegistry::default(),
        ServerConfig {
            static_dir: Some(dir.clone()),
            ..ServerConfig::default()
        },
    );
    let app = create_app(state).await;

    let response = send(app.clone(), Method::GET, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>HR News</h1>");

    let response = send(app.clone(), Method::GET, "/missing.html").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_json_headers(&response);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("/missing.html"));

    // API routes still win over the static fallback.
    let response = send(app, Method::GET, "/api").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_json_headers(&response);

    std::fs::remove_dir_all(&dir).unwrap();
}
