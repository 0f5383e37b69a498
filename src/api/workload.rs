//! Workload analytics endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{Role, StaffStatus},
        request::RequestDetails,
        staff::Staff,
    },
};

use super::AuthenticatedUser;

/// System-wide workload summary
#[derive(Serialize, ToSchema)]
pub struct WorkloadOverview {
    /// Total requests, any status
    pub total_tasks: i64,
    /// Completed requests
    pub completed: i64,
    /// Rounded mean minutes from creation to completion; 0 when none
    pub avg_time_minutes: i64,
    /// round(100 * completed / (completed + cancelled)); 100 on cold start
    pub efficiency: i64,
}

/// Task counts by lifecycle bucket
#[derive(Debug, Default, Clone, Serialize, ToSchema)]
pub struct StaffTaskCounts {
    pub completed: i64,
    /// in_progress + assigned
    pub active: i64,
    /// pending + queued
    pub pending: i64,
    pub cancelled: i64,
    pub total: i64,
}

/// Per-staff workload metrics
#[derive(Serialize, ToSchema)]
pub struct StaffWorkload {
    pub id: Uuid,
    pub employee_code: String,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub current_status: StaffStatus,
    pub current_floor_id: Option<Uuid>,
    pub tasks: StaffTaskCounts,
    pub completion_rate: i64,
    /// 70% completion rate + 30% speed, clamped to [0, 100]
    pub efficiency_score: i64,
    pub avg_time_minutes: i64,
}

/// Detailed workload for one staff member
#[derive(Serialize, ToSchema)]
pub struct StaffWorkloadDetail {
    #[serde(flatten)]
    pub staff: Staff,
    pub tasks: StaffTaskCounts,
    pub completion_rate: i64,
    pub efficiency_score: i64,
    pub avg_time_minutes: i64,
    /// 10 most recent requests involving this member, newest first
    pub recent_tasks: Vec<RequestDetails>,
}

/// Staff workload filters; "all" is treated as no filter
#[derive(Debug, Deserialize, IntoParams)]
pub struct StaffWorkloadQuery {
    pub role: Option<String>,
    pub status: Option<String>,
}

/// System-wide workload summary
#[utoipa::path(
    get,
    path = "/workload",
    tag = "workload",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Workload overview", body = WorkloadOverview)
    )
)]
pub async fn get_overview(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<WorkloadOverview>> {
    let summary = state.services.workload.system_summary().await?;
    Ok(Json(summary))
}

/// Per-staff workload metrics with optional role/status filters
#[utoipa::path(
    get,
    path = "/workload/staff",
    tag = "workload",
    security(("bearer_auth" = [])),
    params(StaffWorkloadQuery),
    responses(
        (status = 200, description = "Staff workload list", body = Vec<StaffWorkload>),
        (status = 400, description = "Invalid filter value")
    )
)]
pub async fn list_staff_workload(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<StaffWorkloadQuery>,
) -> AppResult<Json<Vec<StaffWorkload>>> {
    let role = query
        .role
        .as_deref()
        .filter(|r| *r != "all")
        .map(str::parse)
        .transpose()
        .map_err(AppError::Validation)?;
    let status = query
        .status
        .as_deref()
        .filter(|s| *s != "all")
        .map(str::parse)
        .transpose()
        .map_err(AppError::Validation)?;

    let summaries = state.services.workload.staff_summary(role, status).await?;
    Ok(Json(summaries))
}

/// Detailed workload for one staff member
#[utoipa::path(
    get,
    path = "/workload/staff/{id}",
    tag = "workload",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Staff member ID")),
    responses(
        (status = 200, description = "Staff workload detail", body = StaffWorkloadDetail),
        (status = 404, description = "Staff member not found")
    )
)]
pub async fn get_staff_workload(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StaffWorkloadDetail>> {
    let detail = state.services.workload.staff_detail(id).await?;
    Ok(Json(detail))
}
