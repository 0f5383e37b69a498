//! Transport request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Priority,
        request::{RequestDetails, RequestFilter, TransportRequest},
    },
    services::dispatch::CreateRequestInput,
};

use super::AuthenticatedUser;

/// Create request payload. The requester is the authenticated caller.
#[derive(Deserialize, ToSchema)]
pub struct CreateRequestBody {
    pub patient_name: Option<String>,
    /// 1=STAT, 2=HIGH, 3=NORMAL, 4=LOW
    pub priority: i16,
    /// "wheelchair" or "bed"
    pub equipment_type: String,
    pub pickup_room_id: Uuid,
    pub destination_room_id: Uuid,
    pub notes: Option<String>,
    pub estimated_duration_minutes: Option<i32>,
}

/// Status update payload
#[derive(Deserialize, ToSchema)]
pub struct UpdateStatusBody {
    /// Target status (pending/queued/assigned/in_progress/completed/cancelled)
    pub status: String,
}

/// Assignment payload
#[derive(Deserialize, ToSchema)]
pub struct AssignBody {
    /// Staff member taking the request
    pub assignee_id: Uuid,
    /// Equipment unit to couple, must be available
    pub equipment_id: Option<Uuid>,
}

/// Request list filters
#[derive(Debug, Deserialize, IntoParams)]
pub struct RequestListQuery {
    pub status: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub requested_by: Option<Uuid>,
    pub equipment_type: Option<String>,
    pub priority: Option<i16>,
}

impl RequestListQuery {
    fn into_filter(self) -> AppResult<RequestFilter> {
        Ok(RequestFilter {
            status: self
                .status
                .as_deref()
                .map(str::parse)
                .transpose()
                .map_err(AppError::Validation)?,
            assigned_to: self.assigned_to,
            requested_by: self.requested_by,
            equipment_type: self
                .equipment_type
                .as_deref()
                .map(str::parse)
                .transpose()
                .map_err(AppError::Validation)?,
            priority: self.priority.map(Priority::try_from).transpose()?,
        })
    }
}

/// List requests with optional filters, newest first
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(RequestListQuery),
    responses(
        (status = 200, description = "List of requests", body = Vec<RequestDetails>),
        (status = 400, description = "Invalid filter value")
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<RequestListQuery>,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let filter = query.into_filter()?;
    let requests = state.services.dispatch.list_requests(&filter).await?;
    Ok(Json(requests))
}

/// Active work queue for the caller: requester or assignee, open
/// statuses only, STAT first then oldest first
#[utoipa::path(
    get,
    path = "/requests/active",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active requests for caller", body = Vec<RequestDetails>)
    )
)]
pub async fn active_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state
        .services
        .dispatch
        .list_active_for_user(claims.user_id)
        .await?;
    Ok(Json(requests))
}

/// All requests created by the caller
#[utoipa::path(
    get,
    path = "/requests/mine",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Requests created by caller", body = Vec<RequestDetails>)
    )
)]
pub async fn my_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state
        .services
        .dispatch
        .list_requested_by(claims.user_id)
        .await?;
    Ok(Json(requests))
}

/// All requests assigned to the caller
#[utoipa::path(
    get,
    path = "/requests/assigned",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Requests assigned to caller", body = Vec<RequestDetails>)
    )
)]
pub async fn assigned_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state
        .services
        .dispatch
        .list_assigned_to(claims.user_id)
        .await?;
    Ok(Json(requests))
}

/// Get request by ID with joined display data
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = RequestDetails),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RequestDetails>> {
    let request = state.services.dispatch.get_request(id).await?;
    Ok(Json(request))
}

/// Create a new transport request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateRequestBody,
    responses(
        (status = 201, description = "Request created", body = RequestDetails),
        (status = 400, description = "Invalid priority, equipment type or room")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(body): Json<CreateRequestBody>,
) -> AppResult<(StatusCode, Json<RequestDetails>)> {
    let created = state
        .services
        .dispatch
        .create_request(
            claims.user_id,
            CreateRequestInput {
                patient_name: body.patient_name,
                priority: body.priority,
                equipment_type: body.equipment_type,
                pickup_room_id: body.pickup_room_id,
                destination_room_id: body.destination_room_id,
                notes: body.notes,
                estimated_duration_minutes: body.estimated_duration_minutes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Advance request status; completed stamps the completion time
#[utoipa::path(
    put,
    path = "/requests/{id}/status",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateStatusBody,
    responses(
        (status = 200, description = "Status updated", body = TransportRequest),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is in a terminal state")
    )
)]
pub async fn update_request_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusBody>,
) -> AppResult<Json<TransportRequest>> {
    let updated = state
        .services
        .dispatch
        .advance_status(id, &body.status)
        .await?;
    Ok(Json(updated))
}

/// Assign a request to a staff member, optionally coupling equipment.
/// Request and equipment writes commit atomically or not at all.
#[utoipa::path(
    put,
    path = "/requests/{id}/assign",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = AssignBody,
    responses(
        (status = 200, description = "Request assigned", body = RequestDetails),
        (status = 404, description = "Request, staff member or equipment not found"),
        (status = 409, description = "Equipment is not available")
    )
)]
pub async fn assign_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AssignBody>,
) -> AppResult<Json<RequestDetails>> {
    let assigned = state
        .services
        .dispatch
        .assign_request(id, body.assignee_id, body.equipment_id)
        .await?;
    Ok(Json(assigned))
}

/// Cancel a request. History is kept; rows are never deleted.
#[utoipa::path(
    delete,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request cancelled", body = TransportRequest),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already completed")
    )
)]
pub async fn cancel_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TransportRequest>> {
    let cancelled = state.services.dispatch.cancel_request(id).await?;
    Ok(Json(cancelled))
}
