//! Route handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::error::AppError;
use crate::models::ApiResponse;
use crate::scrapers::{self, HomepageSource};
use crate::server::app::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    /// Include per-section diagnostics in the response.
    #[serde(default)]
    pub diagnostics: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

/// `GET /api/news`: fetch the homepage and return its records.
pub async fn news_handler<S: HomepageSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<NewsQuery>,
) -> (StatusCode, Json<ApiResponse>) {
    let outcome = match state.source.fetch().await {
        Ok(html) => scrapers::extract(&html, &state.base_origin, query.diagnostics),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => {
            info!(count = result.count, "Served news");
            (StatusCode::OK, Json(ApiResponse::Success(result)))
        }
        Err(e) => {
            error!(error = %e, "Scraping error");
            (
                status_for(&e),
                Json(ApiResponse::error("Failed to fetch news data", &e)),
            )
        }
    }
}

/// `GET /health`, `GET /api/health`.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// `GET /`.
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "status": "Server is running" }))
}

pub async fn not_found_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
}

/// Upstream HTTP failures map to gateway errors, everything else to 500.
pub fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::Http(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        AppError::Http(e) if e.status().is_some() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
