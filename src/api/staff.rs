//! Staff directory endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::staff::{CreateStaff, Staff},
};

use super::AuthenticatedUser;

/// Staff list filters
#[derive(Debug, Deserialize, IntoParams)]
pub struct StaffListQuery {
    pub role: Option<String>,
    pub status: Option<String>,
}

/// List staff with optional role/status filters
#[utoipa::path(
    get,
    path = "/staff",
    tag = "staff",
    security(("bearer_auth" = [])),
    params(StaffListQuery),
    responses(
        (status = 200, description = "List of staff members", body = Vec<Staff>),
        (status = 400, description = "Invalid filter value")
    )
)]
pub async fn list_staff(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<StaffListQuery>,
) -> AppResult<Json<Vec<Staff>>> {
    let role = query
        .role
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(AppError::Validation)?;
    let status = query
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(AppError::Validation)?;

    let members = state.services.staff.list(role, status).await?;
    Ok(Json(members))
}

/// Get staff member by ID
#[utoipa::path(
    get,
    path = "/staff/{id}",
    tag = "staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Staff member ID")),
    responses(
        (status = 200, description = "Staff member", body = Staff),
        (status = 404, description = "Staff member not found")
    )
)]
pub async fn get_staff(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Staff>> {
    let member = state.services.staff.get_by_id(id).await?;
    Ok(Json(member))
}

/// Create a new staff member (admin only)
#[utoipa::path(
    post,
    path = "/staff",
    tag = "staff",
    security(("bearer_auth" = [])),
    request_body = CreateStaff,
    responses(
        (status = 201, description = "Staff member created", body = Staff),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Employee code already exists")
    )
)]
pub async fn create_staff(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(body): Json<CreateStaff>,
) -> AppResult<(StatusCode, Json<Staff>)> {
    claims.require_admin()?;

    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let member = state.services.staff.create(body).await?;
    Ok((StatusCode::CREATED, Json(member)))
}
