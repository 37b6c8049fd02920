use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use nimbus_core::{Provider, Session, ToolRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub tools: Arc<ToolRegistry>,
    pub max_iterations: usize,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    query: Option<String>,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    answer: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Build the router: `POST /ask`, permissive CORS, no auth.
pub fn ask_router(state: AppState) -> Router {
    Router::new()
        .route("/ask", post(ask_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Each request gets its own session; transcripts are not shared across
/// HTTP callers.
async fn ask_handler(State(state): State<AppState>, Json(body): Json<AskRequest>) -> Response {
    let query = match body.query.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Query is required".to_string(),
                }),
            )
                .into_response();
        }
    };

    let mut session = Session::new(state.provider.clone(), state.tools.clone())
        .with_max_iterations(state.max_iterations);

    match session.ask(&query).await {
        Ok(answer) => (StatusCode::OK, Json(AskResponse { answer })).into_response(),
        Err(e) => {
            error!(error = %e, "ask request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn run(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "nimbus server listening on http://{}", addr);
    axum::serve(listener, ask_router(state)).await?;
    Ok(())
}
