//! Hospital directory endpoints: floors and rooms

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{Equipment, EquipmentFilter},
        location::{Floor, RoomFilter, RoomSummary},
    },
};

use super::AuthenticatedUser;

/// Room list filters
#[derive(Debug, Deserialize, IntoParams)]
pub struct RoomListQuery {
    pub floor_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub room_type: Option<String>,
    pub search: Option<String>,
}

/// Room autocomplete query
#[derive(Debug, Deserialize, IntoParams)]
pub struct RoomSearchQuery {
    /// Search term, required
    pub q: String,
    pub floor_id: Option<Uuid>,
}

/// Floor equipment filters
#[derive(Debug, Deserialize, IntoParams)]
pub struct FloorEquipmentQuery {
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
    pub status: Option<String>,
}

/// List all floors
#[utoipa::path(
    get,
    path = "/floors",
    tag = "directory",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of floors", body = Vec<Floor>)
    )
)]
pub async fn list_floors(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Floor>>> {
    let floors = state.services.directory.list_floors().await?;
    Ok(Json(floors))
}

/// All equipment currently on a floor
#[utoipa::path(
    get,
    path = "/floors/{id}/equipment",
    tag = "directory",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Floor ID"),
        FloorEquipmentQuery
    ),
    responses(
        (status = 200, description = "Equipment on floor", body = Vec<Equipment>),
        (status = 404, description = "Floor not found")
    )
)]
pub async fn floor_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<FloorEquipmentQuery>,
) -> AppResult<Json<Vec<Equipment>>> {
    state.services.directory.get_floor(id).await?;

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
        floor_id: Some(id),
    };

    let units = state.services.dispatch.list_equipment(&filter).await?;
    Ok(Json(units))
}

/// List rooms with directory context for dropdowns
#[utoipa::path(
    get,
    path = "/rooms",
    tag = "directory",
    security(("bearer_auth" = [])),
    params(RoomListQuery),
    responses(
        (status = 200, description = "List of rooms", body = Vec<RoomSummary>)
    )
)]
pub async fn list_rooms(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<RoomListQuery>,
) -> AppResult<Json<Vec<RoomSummary>>> {
    let rooms = state
        .services
        .directory
        .list_rooms(&RoomFilter {
            floor_id: query.floor_id,
            zone_id: query.zone_id,
            room_type: query.room_type,
            search: query.search,
        })
        .await?;
    Ok(Json(rooms))
}

/// Room autocomplete search
#[utoipa::path(
    get,
    path = "/rooms/search",
    tag = "directory",
    security(("bearer_auth" = [])),
    params(RoomSearchQuery),
    responses(
        (status = 200, description = "Matching rooms", body = Vec<RoomSummary>),
        (status = 400, description = "Empty search term")
    )
)]
pub async fn search_rooms(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<RoomSearchQuery>,
) -> AppResult<Json<Vec<RoomSummary>>> {
    if query.q.trim().is_empty() {
        return Err(AppError::Validation(
            "Search query 'q' is required".to_string(),
        ));
    }

    let rooms = state
        .services
        .directory
        .search_rooms(query.q.trim(), query.floor_id)
        .await?;
    Ok(Json(rooms))
}

/// Get room by ID with directory context
#[utoipa::path(
    get,
    path = "/rooms/{id}",
    tag = "directory",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room details", body = RoomSummary),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RoomSummary>> {
    let room = state.services.directory.get_room(id).await?;
    Ok(Json(room))
}
