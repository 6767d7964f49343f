//! Route definitions and server setup

use axum::{
    Router,
    http::{HeaderName, Method, StatusCode, header},
    middleware,
    routing::get,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use bearded_core::config::ServerConfig;
use bearded_core::domain::catalog::TargetType;
use bearded_core::domain::scan::ScanStatus;

use crate::presentation::{
    controllers::{
        OrchestratorState,
        health::health_check,
        scans::{create_scan, delete_scan, get_scan, list_scans},
    },
    middleware::{inject_auth_state_middleware, logging_middleware},
    models::*,
};

/// Registers the API key schemes referenced by the scan endpoints
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
        );
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::scans::create_scan,
        crate::presentation::controllers::scans::list_scans,
        crate::presentation::controllers::scans::get_scan,
        crate::presentation::controllers::scans::delete_scan,
        crate::presentation::controllers::health::health_check
    ),
    components(
        schemas(
            CreateScanRequest,
            ScanDto,
            SessionDto,
            WorkflowStepDto,
            ScanConfDto,
            ScanListResponse,
            ListMeta,
            ErrorResponse,
            HealthResponse,
            ScanStatus,
            TargetType
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "scans", description = "Scan creation, retrieval, listing and deletion"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "Bearded API",
        version = "0.3.0",
        description = "Scan orchestration API. A scan is expanded from a plan's workflow into one session per plugin step.",
        license(
            name = "AGPL-3.0",
            url = "https://www.gnu.org/licenses/agpl-3.0.html"
        )
    )
)]
pub struct ApiDoc;

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let allow_origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| {
                axum::http::HeaderValue::from_str(origin)
                    .map_err(|_| {
                        tracing::warn!(origin, "Invalid CORS origin in config; skipping");
                    })
                    .ok()
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(Duration::from_secs(3600))
}

/// Create the application router with its middleware stack
///
/// `PUT /api/v1/scans/{id}` is deliberately unrouted and answers 405.
pub fn create_router(orchestrator_state: OrchestratorState, config: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .route("/scans", get(list_scans).post(create_scan))
        .route("/scans/{id}", get(get_scan).delete(delete_scan));

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check));

    if config.enable_docs {
        router =
            router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_seconds),
        ))
        .layer(middleware::from_fn_with_state(
            orchestrator_state.clone(),
            inject_auth_state_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware));

    router.layer(service_builder).with_state(orchestrator_state)
}
