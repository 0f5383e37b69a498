//! Hospital directory models. Read-mostly reference data; the dispatch
//! core passes ids through and joins for display only.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Floor record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Floor {
    pub id: Uuid,
    pub name: String,
    pub building: String,
}

/// Short room representation embedded in request views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomRef {
    pub id: Uuid,
    pub name: String,
    pub room_type: Option<String>,
}

/// Room with directory context, shaped for dropdown/autocomplete use
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomSummary {
    pub id: Uuid,
    pub name: String,
    pub room_type: Option<String>,
    /// "Room 204 - Floor 2"
    pub display_name: String,
    pub zone: String,
    pub floor: String,
    pub floor_id: Uuid,
    pub building: String,
}

/// Optional filters for room lookups
#[derive(Debug, Default, Clone)]
pub struct RoomFilter {
    pub floor_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub room_type: Option<String>,
    pub search: Option<String>,
}
