//! Serve command handler.
//!
//! The HTTP boundary: one `POST /ask` endpoint plus a health probe.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Args;
use edi_core::{AppConfig, AppResult};
use edi_engine::AnswerEngine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Run the HTTP boundary
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Bind address (overrides configuration)
    #[arg(short, long)]
    pub bind: Option<String>,
}

#[derive(Clone)]
struct AppState {
    engine: Arc<AnswerEngine>,
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    answer: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ServeCommand {
    /// Execute the serve command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let engine = Arc::new(super::build_engine(config)?);
        let state = AppState { engine };

        let app = Router::new()
            .route("/ask", post(ask_handler))
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state);

        let bind = self.bind.as_deref().unwrap_or(&config.bind_addr);
        tracing::info!("Listening on {}", bind);

        let listener = tokio::net::TcpListener::bind(bind).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn ask_handler(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, Json<ErrorBody>)> {
    let question = payload.question.trim();

    if question.is_empty() {
        return Err(bad_request("No question provided"));
    }

    match state.engine.answer(question).await {
        Ok(answer) => Ok(Json(AskResponse { answer })),
        Err(e) => {
            tracing::error!("Failed to answer question: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}
