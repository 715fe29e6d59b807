//! HTTP boundary for the checker.
//!
//! `POST /api/check-spam` takes `{"email": "..."}` and answers
//! `{"isSpam": bool}`. Bad input is a 400 with a short message; any failure
//! inside the check is a 500 whose details only go to the event sink.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::checker::{Checker, FailurePolicy};
use crate::config::Config;
use crate::sink::EventSink;
use crate::strategy::SpamStrategy;
use crate::validation::is_valid_email;

/// Shared per-process state. Strategies are built once and handed to a
/// fresh [`Checker`] on every request.
#[derive(Clone)]
pub struct AppState {
    pub strategies: Vec<Arc<dyn SpamStrategy>>,
    pub sink: Arc<dyn EventSink>,
    pub policy: FailurePolicy,
    pub redact: bool,
}

impl AppState {
    pub fn new(strategies: Vec<Arc<dyn SpamStrategy>>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            strategies,
            sink,
            policy: FailurePolicy::default(),
            redact: true,
        }
    }

    pub fn from_config(config: &Config, sink: Arc<dyn EventSink>) -> anyhow::Result<Self> {
        Ok(Self {
            strategies: config.build_strategies()?,
            sink,
            policy: config.failure_policy,
            redact: config.redact_emails,
        })
    }

    pub fn checker(&self) -> Checker {
        Checker::new(self.strategies.clone(), self.sink.clone())
            .with_policy(self.policy)
            .with_redaction(self.redact)
    }
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    #[serde(rename = "isSpam")]
    pub is_spam: bool,
}

#[derive(Debug)]
pub enum ApiError {
    InvalidJson,
    InvalidEmail,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidJson => (StatusCode::BAD_REQUEST, "Invalid JSON input"),
            ApiError::InvalidEmail => (StatusCode::BAD_REQUEST, "Invalid email format"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

async fn check_spam(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CheckResponse>, ApiError> {
    let payload: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::InvalidJson)?;

    let email = payload
        .get("email")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();

    if !is_valid_email(email) {
        return Err(ApiError::InvalidEmail);
    }

    match state.checker().is_spam(email).await {
        Ok(is_spam) => Ok(Json(CheckResponse { is_spam })),
        // The checker has already recorded the failure.
        Err(_) => Err(ApiError::Internal),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/check-spam", post(check_spam))
        .with_state(Arc::new(state))
}

/// Serve until `shutdown` resolves. Dropping a connection mid-request drops
/// the handler future along with any lookup still in flight.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        log::info!("Spam check endpoint listening on {addr}");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    log::info!("Spam check endpoint stopped");
    Ok(())
}
