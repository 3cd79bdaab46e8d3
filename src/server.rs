//! Keepalive HTTP endpoints for hosting platforms that idle silent processes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

use crate::app::{AppContext, Result};

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/status", get(status))
        .with_state(ctx)
}

/// Serve the keepalive endpoints on `0.0.0.0:port` until the task is dropped.
pub async fn serve(ctx: Arc<AppContext>, port: u16) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Keepalive server listening on {}", listener.local_addr()?);
    axum::serve(listener, router(ctx)).await?;
    Ok(())
}

async fn health(State(ctx): State<Arc<AppContext>>) -> String {
    let status = ctx.status();
    format!(
        "✅ Matchday bot is running!\n\
         🕐 Current time: {}\n\
         👥 Subscribers: {}\n\
         🔄 Status: Active",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        status.subscriber_count
    )
}

async fn status(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let status = ctx.status();
    let now = Local::now();
    Json(json!({
        "status": "active",
        "subscribers": status.subscriber_count,
        "timestamp": now.to_rfc3339(),
        "uptime": status.uptime_secs(now),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::SubscriberId;
    use crate::extractor::EventExtractor;
    use crate::fetcher::testing::StaticFetcher;
    use crate::scheduler::SystemClock;

    fn context() -> Arc<AppContext> {
        Arc::new(AppContext::with_parts(
            Arc::new(StaticFetcher::new("")),
            EventExtractor::default(),
            Arc::new(SystemClock),
            "https://example.com/events",
        ))
    }

    async fn get_body(ctx: Arc<AppContext>, uri: &str) -> (StatusCode, String, String) {
        let response = router(ctx)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_is_plain_text() {
        let ctx = context();
        ctx.subscribe(SubscriberId(1));

        for uri in ["/", "/health"] {
            let (status, content_type, body) = get_body(ctx.clone(), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert!(content_type.starts_with("text/plain"));
            assert!(body.contains("Subscribers: 1"));
        }
    }

    #[tokio::test]
    async fn test_status_is_json() {
        let ctx = context();
        ctx.subscribe(SubscriberId(1));
        ctx.subscribe(SubscriberId(2));

        let (status, content_type, body) = get_body(ctx, "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("application/json"));

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "active");
        assert_eq!(value["subscribers"], 2);
        assert!(value["timestamp"].is_string());
        assert!(value["uptime"].as_i64().unwrap() >= 0);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _, _) = get_body(context(), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
