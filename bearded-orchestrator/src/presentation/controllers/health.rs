//! Health check controller

use axum::{extract::State, http::StatusCode, response::Json};

use crate::presentation::controllers::OrchestratorState;
use crate::presentation::models::HealthResponse;

/// GET /health - Service health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Storage unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<OrchestratorState>) -> (StatusCode, Json<HealthResponse>) {
    let (backend, storage_healthy) = match &state.db_pool {
        Some(pool) => {
            let healthy = match sqlx::query("SELECT 1").execute(&**pool).await {
                Ok(_) => true,
                Err(e) => {
                    tracing::error!(error = %e, "Database health check failed");
                    false
                }
            };
            ("postgres", healthy)
        }
        None => ("memory", true),
    };

    let (status_code, status) = if storage_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            details: Some(serde_json::json!({
                "storage": {
                    "backend": backend,
                    "status": status,
                }
            })),
        }),
    )
}
