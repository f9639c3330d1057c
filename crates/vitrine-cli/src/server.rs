//! HTTP endpoints.
//!
//! | Route | Method | Purpose |
//! |-------|--------|---------|
//! | `/api/search` | POST | `{ "query": "..." }` → four result lists plus `mode` |
//! | `/api/reindex` | POST | Re-embed every record, report per-collection counts |
//! | `/health` | GET | Liveness |

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info, warn};
use serde_json::{json, Value};
use vitrine_core::Result;

use crate::state::AppState;

/// Build the HTTP router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", post(search))
        .route("/api/reindex", post(reindex))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind `addr` and serve until the process exits.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

#[tracing::instrument(name = "api_search", skip_all)]
async fn search(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {}", rejection.body_text()),
            );
        }
    };

    let Some(query) = body.get("query").and_then(Value::as_str) else {
        return error_response(StatusCode::BAD_REQUEST, "query must be a string");
    };

    match state.router().search(query).await {
        Ok(response) => Json(response).into_response(),
        Err(e) if e.is_input_error() => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            error!("Search failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[tracing::instrument(name = "api_reindex", skip_all)]
async fn reindex(State(state): State<AppState>) -> Response {
    match state.indexer().reindex_all().await {
        Ok(report) => Json(json!({
            "success": true,
            "indexed": report.indexed,
        }))
        .into_response(),
        Err(e) => {
            let status = if e.is_missing_precondition() {
                warn!("Reindex refused: {e}");
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                error!("Reindex failed: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (
                status,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VitrineConfig;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;
    use vitrine_core::{Collection, ContentRecord};
    use vitrine_search::{EmbeddingProvider, MemoryContentStore, MockEmbeddingProvider};

    fn scenario_store() -> Arc<MemoryContentStore> {
        Arc::new(MemoryContentStore::from_records(vec![
            ContentRecord::new(
                Collection::Project,
                "p-1",
                "million-dollar-quartet",
                "Million Dollar Quartet",
            ),
            ContentRecord::new(
                Collection::Article,
                "a-1",
                "becoming-a-scenic-designer",
                "Becoming a Scenic Designer",
            ),
        ]))
    }

    fn app(provider: Option<Arc<dyn EmbeddingProvider>>) -> Router {
        router(AppState::with_store(
            VitrineConfig::default(),
            scenario_store(),
            provider,
        ))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    // ------------------------------------------------------------------------
    // /api/search
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_search_keyword_scenario() {
        let (status, body) = send(
            app(None),
            post_json("/api/search", r#"{"query":"quartet"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "keyword");
        assert_eq!(body["projects"][0]["title"], "Million Dollar Quartet");
        assert_eq!(body["projects"][0]["locator"], "/projects/million-dollar-quartet");
        assert_eq!(body["tutorials"], json!([]));
        assert_eq!(body["articles"], json!([]));
        assert_eq!(body["news"], json!([]));
    }

    #[tokio::test]
    async fn test_search_semantic_with_provider() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(8));
        let (status, body) = send(
            app(Some(provider)),
            post_json("/api/search", r#"{"query":"quartet"}"#),
        )
        .await;

        // Nothing is indexed yet, so semantic mode finds nothing.
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "semantic");
        assert_eq!(body["projects"], json!([]));
    }

    #[tokio::test]
    async fn test_search_rejects_bad_input() {
        for payload in [
            r#"{"query":"   "}"#,
            r#"{"query":42}"#,
            r#"{}"#,
            r#"not json"#,
        ] {
            let (status, body) = send(app(None), post_json("/api/search", payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
            assert!(body["error"].is_string());
        }
    }

    // ------------------------------------------------------------------------
    // /api/reindex
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_reindex_without_provider_is_503() {
        let (status, body) = send(app(None), post_json("/api/reindex", "")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("embedding"));
    }

    #[tokio::test]
    async fn test_reindex_reports_counts() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(8));
        let (status, body) = send(app(Some(provider)), post_json("/api/reindex", "")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["indexed"],
            json!({"projects": 1, "tutorials": 0, "articles": 1, "news": 0})
        );
    }

    // ------------------------------------------------------------------------
    // /health
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }
}
