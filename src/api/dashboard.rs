//! Dashboard endpoints for the logged-in staff member

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        enums::RequestStatus,
        equipment::Equipment,
        request::RequestDetails,
        staff::Staff,
    },
};

use super::AuthenticatedUser;

/// Available equipment near the caller
#[derive(Serialize, ToSchema)]
pub struct NearbyEquipmentSummary {
    pub count: usize,
    pub equipment: Vec<Equipment>,
}

/// Dashboard payload: caller profile, nearby equipment, open work
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub user: Staff,
    pub nearby_equipment: NearbyEquipmentSummary,
    pub active_tasks: Vec<RequestDetails>,
}

/// Status counts for requests assigned to the caller
#[derive(Serialize, ToSchema)]
pub struct MyStatsResponse {
    pub total_requests: usize,
    pub completed: usize,
    pub in_progress: usize,
    /// pending + queued + assigned
    pub pending: usize,
}

/// Dashboard for the logged-in staff member
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse)
    )
)]
pub async fn get_dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<DashboardResponse>> {
    let user = state.services.staff.get_by_id(claims.user_id).await?;

    let equipment = match user.current_floor_id {
        Some(floor_id) => {
            state
                .services
                .dispatch
                .nearby_equipment(floor_id, None)
                .await?
        }
        None => Vec::new(),
    };

    let active_tasks = state
        .services
        .dispatch
        .list_active_for_user(claims.user_id)
        .await?;

    Ok(Json(DashboardResponse {
        user,
        nearby_equipment: NearbyEquipmentSummary {
            count: equipment.len(),
            equipment,
        },
        active_tasks,
    }))
}

/// Status counts for the caller's assigned requests
#[utoipa::path(
    get,
    path = "/dashboard/stats",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's request statistics", body = MyStatsResponse)
    )
)]
pub async fn get_my_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<MyStatsResponse>> {
    let statuses = state
        .services
        .workload
        .assigned_statuses(claims.user_id)
        .await?;

    let completed = statuses
        .iter()
        .filter(|s| **s == RequestStatus::Completed)
        .count();
    let in_progress = statuses
        .iter()
        .filter(|s| **s == RequestStatus::InProgress)
        .count();
    let pending = statuses
        .iter()
        .filter(|s| {
            matches!(
                s,
                RequestStatus::Pending | RequestStatus::Queued | RequestStatus::Assigned
            )
        })
        .count();

    Ok(Json(MyStatsResponse {
        total_requests: statuses.len(),
        completed,
        in_progress,
        pending,
    }))
}
