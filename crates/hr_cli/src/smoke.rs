//! Network smoke test against a running deployment.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

const PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Any HTTP response counts.
    Reachable,
    /// 2xx with a JSON body.
    Json,
    /// 2xx with a news payload carrying `news_count` and `success: true`.
    News,
}

pub const CHECKS: [(&str, Expect); 3] = [
    ("/api/test", Expect::Json),
    ("/api", Expect::News),
    ("/", Expect::Reachable),
];

#[derive(Debug)]
pub struct Outcome {
    pub url: Url,
    pub status: Option<u16>,
    pub content_type: Option<String>,
    pub preview: String,
    pub failure: Option<String>,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

pub fn endpoint_url(base: &Url, path: &str) -> Result<Url> {
    base.join(path)
        .with_context(|| format!("cannot join {} onto {}", path, base))
}

/// First `limit` characters of `body`, with `...` when cut.
pub fn preview(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Returns `(news_count, success)` from an `/api` body.
pub fn inspect_news(body: &str) -> Result<(u64, bool)> {
    let value: Value = serde_json::from_str(body).context("invalid JSON")?;
    let news_count = value["news_count"]
        .as_u64()
        .context("missing `news_count`")?;
    let success = value["success"].as_bool().context("missing `success`")?;
    Ok((news_count, success))
}

fn evaluate(expect: Expect, status: u16, body: &str) -> Option<String> {
    let ok_status = (200..300).contains(&status);
    match expect {
        Expect::Reachable => None,
        Expect::Json if !ok_status => Some(format!("unexpected status {}", status)),
        Expect::Json => serde_json::from_str::<Value>(body)
            .err()
            .map(|e| format!("invalid JSON: {}", e)),
        Expect::News if !ok_status => Some(format!("unexpected status {}", status)),
        Expect::News => match inspect_news(body) {
            Ok((count, true)) => {
                info!("✅ Valid JSON response, news count: {}", count);
                None
            }
            Ok((_, false)) => Some("payload reports success: false".to_string()),
            Err(e) => Some(format!("{:#}", e)),
        },
    }
}

async fn check(client: &Client, url: Url, expect: Expect) -> Outcome {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            let failure = if e.is_timeout() {
                "timeout".to_string()
            } else {
                e.to_string()
            };
            return Outcome {
                url,
                status: None,
                content_type: None,
                preview: String::new(),
                failure: Some(failure),
            };
        }
    };

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let (body, failure) = match response.text().await {
        Ok(body) => {
            let failure = evaluate(expect, status, &body);
            (body, failure)
        }
        Err(e) => (String::new(), Some(format!("failed to read body: {}", e))),
    };

    Outcome {
        url,
        status: Some(status),
        content_type,
        preview: preview(&body, PREVIEW_CHARS),
        failure,
    }
}

/// Runs every check in order. Individual failures are reported, not returned.
pub async fn run(base: &Url, timeout: Duration) -> Result<Vec<Outcome>> {
    let client = Client::builder().timeout(timeout).build()?;
    info!("🧪 Testing HR News API endpoints at {}", base);

    let mut outcomes = Vec::with_capacity(CHECKS.len());
    for (path, expect) in CHECKS {
        let outcome = check(&client, endpoint_url(base, path)?, expect).await;
        report(&outcome);
        outcomes.push(outcome);
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    info!("🎉 Testing completed: {} passed, {} failed", outcomes.len() - failed, failed);
    Ok(outcomes)
}

fn report(outcome: &Outcome) {
    let status = outcome
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let content_type = outcome.content_type.as_deref().unwrap_or("-");
    match &outcome.failure {
        None => info!("✅ {} status={} content-type={}", outcome.url, status, content_type),
        Some(reason) => warn!(
            "❌ {} status={} content-type={}: {}",
            outcome.url, status, content_type, reason
        ),
    }
    if !outcome.preview.is_empty() {
        info!("Response: {}", outcome.preview);
    }
}
