//! Health Check API Handler
//!
//! Liveness probe; does not touch the ledger or the remote services.

use axum::{http::StatusCode, response::IntoResponse};

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
