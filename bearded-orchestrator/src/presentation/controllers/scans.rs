//! Scan API controllers

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{Json, Response},
};
use tracing::{info, instrument};

use bearded_core::domain::ids::ScanId;
use bearded_core::domain::scan::ScanFilter;

use crate::presentation::auth::Auth;
use crate::presentation::controllers::{OrchestratorState, error_response, map_scan_error};
use crate::presentation::models::{
    CreateScanRequest, ErrorResponse, ListMeta, ListScansQuery, ScanDto, ScanListResponse,
};

const SCANS_PATH: &str = "/api/v1/scans";

fn parse_scan_id(raw: &str) -> Result<ScanId, Response> {
    ScanId::parse(raw).map_err(|e| {
        info!(id = raw, "Rejected malformed scan id");
        error_response(StatusCode::BAD_REQUEST, "INVALID_ID", &e.to_string())
    })
}

/// Link to another page of the same listing
fn page_link(filter: &ScanFilter, skip: u64, limit: u64) -> String {
    let mut link = format!("{}?skip={}&limit={}", SCANS_PATH, skip, limit);
    if let Some(project) = filter.project {
        link.push_str(&format!("&project={}", project));
    }
    if let Some(target) = filter.target {
        link.push_str(&format!("&target={}", target));
    }
    if let Some(plan) = filter.plan {
        link.push_str(&format!("&plan={}", plan));
    }
    if let Some(status) = filter.status {
        link.push_str(&format!("&status={}", status));
    }
    link
}

/// POST /api/v1/scans - Create a scan
#[utoipa::path(
    post,
    path = "/api/v1/scans",
    request_body = CreateScanRequest,
    responses(
        (status = 201, description = "Scan created", body = ScanDto),
        (status = 400, description = "Wrong entity, unknown or mismatched references, or unknown plugin", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Scan already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "scans",
    security(
        ("api_key" = []),
        ("bearer" = [])
    )
)]
#[instrument(skip(state, auth, request), fields(user_id = %auth.user_id))]
pub async fn create_scan(
    State(state): State<OrchestratorState>,
    auth: Auth,
    request: Result<Json<CreateScanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ScanDto>), Response> {
    let Json(request) = request.map_err(|rejection| {
        info!(reason = %rejection.body_text(), "Rejected unreadable scan body");
        error_response(StatusCode::BAD_REQUEST, "WRONG_ENTITY", "wrong entity")
    })?;

    let scan = state
        .create_scan_use_case
        .execute(request.into(), auth.user_id)
        .await
        .map_err(map_scan_error)?;

    Ok((StatusCode::CREATED, Json(scan.into())))
}

/// GET /api/v1/scans - List scans
#[utoipa::path(
    get,
    path = "/api/v1/scans",
    params(ListScansQuery),
    responses(
        (status = 200, description = "Page of scans", body = ScanListResponse),
        (status = 400, description = "Invalid query parameter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "scans",
    security(
        ("api_key" = []),
        ("bearer" = [])
    )
)]
#[instrument(skip(state, auth, query), fields(user_id = %auth.user_id))]
pub async fn list_scans(
    State(state): State<OrchestratorState>,
    auth: Auth,
    query: Result<Query<ListScansQuery>, QueryRejection>,
) -> Result<Json<ScanListResponse>, Response> {
    let Query(query) = query.map_err(|rejection| {
        error_response(StatusCode::BAD_REQUEST, "INVALID_QUERY", &rejection.body_text())
    })?;
    let filter = query
        .into_filter()
        .map_err(|message| error_response(StatusCode::BAD_REQUEST, "INVALID_QUERY", &message))?;

    let page = state
        .list_scans_use_case
        .execute(filter.clone())
        .await
        .map_err(map_scan_error)?;

    let limit = filter.effective_limit();
    let skip = filter.skip;
    let previous = (skip > 0).then(|| page_link(&filter, skip.saturating_sub(limit), limit));
    let next = (skip.saturating_add(page.results.len() as u64) < page.count)
        .then(|| page_link(&filter, skip.saturating_add(limit), limit));

    Ok(Json(ScanListResponse {
        meta: ListMeta {
            count: page.count,
            previous,
            next,
        },
        results: page.results.into_iter().map(ScanDto::from).collect(),
    }))
}

/// GET /api/v1/scans/{id} - Get a scan
#[utoipa::path(
    get,
    path = "/api/v1/scans/{id}",
    params(
        ("id" = String, Path, description = "Scan ID")
    ),
    responses(
        (status = 200, description = "Scan found", body = ScanDto),
        (status = 400, description = "Malformed scan id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Scan not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "scans",
    security(
        ("api_key" = []),
        ("bearer" = [])
    )
)]
#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn get_scan(
    State(state): State<OrchestratorState>,
    auth: Auth,
    Path(id): Path<String>,
) -> Result<Json<ScanDto>, Response> {
    let scan_id = parse_scan_id(&id)?;

    let scan = state
        .get_scan_use_case
        .execute(scan_id)
        .await
        .map_err(map_scan_error)?;

    Ok(Json(scan.into()))
}

/// DELETE /api/v1/scans/{id} - Delete a scan and its sessions
#[utoipa::path(
    delete,
    path = "/api/v1/scans/{id}",
    params(
        ("id" = String, Path, description = "Scan ID")
    ),
    responses(
        (status = 204, description = "Scan deleted"),
        (status = 400, description = "Malformed scan id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Scan not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "scans",
    security(
        ("api_key" = []),
        ("bearer" = [])
    )
)]
#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn delete_scan(
    State(state): State<OrchestratorState>,
    auth: Auth,
    Path(id): Path<String>,
) -> Result<StatusCode, Response> {
    let scan_id = parse_scan_id(&id)?;

    state
        .delete_scan_use_case
        .execute(scan_id)
        .await
        .map_err(map_scan_error)?;

    Ok(StatusCode::NO_CONTENT)
}
