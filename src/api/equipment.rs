//! Equipment registry endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::equipment::{Equipment, EquipmentDetails, EquipmentFilter},
};

use super::AuthenticatedUser;

/// Equipment list filters
#[derive(Debug, Deserialize, IntoParams)]
pub struct EquipmentListQuery {
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
    pub status: Option<String>,
    pub floor_id: Option<Uuid>,
}

/// Nearby equipment query
#[derive(Debug, Deserialize, IntoParams)]
pub struct NearbyQuery {
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
}

/// Equipment search query
#[derive(Debug, Deserialize, IntoParams)]
pub struct EquipmentSearchQuery {
    /// Code substring to match
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
    pub status: Option<String>,
}

/// Equipment status update payload
#[derive(Deserialize, ToSchema)]
pub struct UpdateEquipmentStatusBody {
    /// available, charging or maintenance (in_use is set by assignment)
    pub status: String,
}

/// Nearby available equipment for the caller's floor
#[derive(Serialize, ToSchema)]
pub struct NearbyEquipmentResponse {
    pub count: usize,
    pub equipment: Vec<Equipment>,
    pub floor_id: Uuid,
}

/// List equipment with optional filters
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentListQuery),
    responses(
        (status = 200, description = "List of equipment", body = Vec<Equipment>),
        (status = 400, description = "Invalid filter value")
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EquipmentListQuery>,
) -> AppResult<Json<Vec<Equipment>>> {
    let filter = EquipmentFilter {
        equipment_type: query
            .equipment_type
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(AppError::Validation)?,
        status: query
            .status
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(AppError::Validation)?,
        floor_id: query.floor_id,
    };

    let units = state.services.dispatch.list_equipment(&filter).await?;
    Ok(Json(units))
}

/// Available equipment on the caller's current floor
#[utoipa::path(
    get,
    path = "/equipment/nearby",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(NearbyQuery),
    responses(
        (status = 200, description = "Nearby available equipment", body = NearbyEquipmentResponse),
        (status = 400, description = "Caller has no floor assignment")
    )
)]
pub async fn nearby_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<NearbyEquipmentResponse>> {
    let caller = state.services.staff.get_by_id(claims.user_id).await?;
    let floor_id = caller.current_floor_id.ok_or_else(|| {
        AppError::Validation("User has no floor assignment".to_string())
    })?;

    let equipment_type = query
        .equipment_type
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(AppError::Validation)?;

    let units = state
        .services
        .dispatch
        .nearby_equipment(floor_id, equipment_type)
        .await?;

    Ok(Json(NearbyEquipmentResponse {
        count: units.len(),
        equipment: units,
        floor_id,
    }))
}

/// Search equipment by code, type or status
#[utoipa::path(
    get,
    path = "/equipment/search",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentSearchQuery),
    responses(
        (status = 200, description = "Matching equipment", body = Vec<Equipment>),
        (status = 400, description = "No search criteria given")
    )
)]
pub async fn search_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EquipmentSearchQuery>,
) -> AppResult<Json<Vec<Equipment>>> {
    if query.q.is_none() && query.equipment_type.is_none() && query.status.is_none() {
        return Err(AppError::Validation(
            "Provide a search query (q), type or status".to_string(),
        ));
    }

    let equipment_type = query
        .equipment_type
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

    let units = state
        .services
        .dispatch
        .search_equipment(query.q.as_deref(), equipment_type, status)
        .await?;
    Ok(Json(units))
}

/// Get equipment by ID with location and consuming request
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = EquipmentDetails),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EquipmentDetails>> {
    let details = state.services.dispatch.get_equipment(id).await?;
    Ok(Json(details))
}

/// External equipment status flip (charging/maintenance/available)
#[utoipa::path(
    put,
    path = "/equipment/{id}/status",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = UpdateEquipmentStatusBody,
    responses(
        (status = 200, description = "Status updated", body = Equipment),
        (status = 400, description = "Unknown or disallowed status"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEquipmentStatusBody>,
) -> AppResult<Json<Equipment>> {
    let updated = state
        .services
        .dispatch
        .update_equipment_status(id, &body.status)
        .await?;
    Ok(Json(updated))
}
