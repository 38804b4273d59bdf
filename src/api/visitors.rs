//! Visitor API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

use crate::{
    error::AppResult,
    models::visitor::{DeleteResponse, UpdateStatusRequest, Visitor},
};

/// List all visitors
#[utoipa::path(
    get,
    path = "/visitors",
    tag = "visitors",
    responses(
        (status = 200, description = "Visitors list", body = Vec<Visitor>)
    )
)]
pub async fn list_visitors(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Visitor>>> {
    let visitors = state.services.visitors.find_all().await?;
    Ok(Json(visitors))
}

/// Register a visitor and email their QR code
///
/// Dates in DD-MM-YYYY form are stored as YYYY-MM-DD. Empty fields are ignored.
#[utoipa::path(
    post,
    path = "/visitors",
    tag = "visitors",
    request_body = Visitor,
    responses(
        (status = 201, description = "Visitor created", body = Visitor),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "National ID already registered")
    )
)]
pub async fn create_visitor(
    State(state): State<crate::AppState>,
    Json(input): Json<Map<String, Value>>,
) -> AppResult<(StatusCode, Json<Visitor>)> {
    let committed = state.services.visitors.create(input).await?;
    Ok((StatusCode::CREATED, Json(committed.record)))
}

/// Get visitor by ID
#[utoipa::path(
    get,
    path = "/visitors/{id}",
    tag = "visitors",
    params(("id" = i32, Path, description = "Visitor ID")),
    responses(
        (status = 200, description = "Visitor details", body = Visitor),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn get_visitor(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Visitor>> {
    let visitor = state.services.visitors.find_one(id).await?;
    Ok(Json(visitor))
}

/// Update a visitor (partial) and re-send the QR code
#[utoipa::path(
    put,
    path = "/visitors/{id}",
    tag = "visitors",
    params(("id" = i32, Path, description = "Visitor ID")),
    request_body = Visitor,
    responses(
        (status = 200, description = "Visitor updated", body = Visitor),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn update_visitor(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(input): Json<Map<String, Value>>,
) -> AppResult<Json<Visitor>> {
    let committed = state.services.visitors.update(id, input).await?;
    Ok(Json(committed.record))
}

/// Delete a visitor
#[utoipa::path(
    delete,
    path = "/visitors/{id}",
    tag = "visitors",
    params(("id" = i32, Path, description = "Visitor ID")),
    responses(
        (status = 200, description = "Visitor deleted", body = DeleteResponse),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn delete_visitor(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = state.services.visitors.remove(id).await?;
    Ok(Json(deleted))
}

/// Get visitor by national ID
#[utoipa::path(
    get,
    path = "/visitors/national-id/{nationalid}",
    tag = "visitors",
    params(("nationalid" = String, Path, description = "National ID")),
    responses(
        (status = 200, description = "Visitor details", body = Visitor),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn get_visitor_by_national_id(
    State(state): State<crate::AppState>,
    Path(nationalid): Path<String>,
) -> AppResult<Json<Visitor>> {
    let visitor = state.services.visitors.find_by_national_id(&nationalid).await?;
    Ok(Json(visitor))
}

/// Update visitor status
#[utoipa::path(
    put,
    path = "/visitors/{id}/status",
    tag = "visitors",
    params(("id" = i32, Path, description = "Visitor ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Visitor),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn update_visitor_status(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStatusRequest>,
) -> AppResult<Json<Visitor>> {
    let visitor = state.services.visitors.update_status(id, &request.status).await?;
    Ok(Json(visitor))
}
