//! Equipment unit model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::{EquipmentStatus, EquipmentType, Priority, RequestStatus};

/// Equipment record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: Uuid,
    /// Human-readable asset code (e.g. WC-0012)
    pub equipment_code: String,
    pub equipment_type: EquipmentType,
    pub status: EquipmentStatus,
    pub battery_level: Option<i16>,
    pub current_floor_id: Option<Uuid>,
    pub current_room_id: Option<Uuid>,
    pub current_ap_id: Option<Uuid>,
    pub assigned_request_id: Option<Uuid>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Short equipment representation embedded in request views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentRef {
    pub id: Uuid,
    pub equipment_code: String,
    pub equipment_type: EquipmentType,
    pub status: EquipmentStatus,
    pub battery_level: Option<i16>,
}

/// Summary of the request currently consuming a unit
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssignedRequestSummary {
    pub id: Uuid,
    pub patient_name: Option<String>,
    pub priority: Priority,
    pub status: RequestStatus,
    pub pickup_room_name: Option<String>,
    pub destination_room_name: Option<String>,
}

/// Equipment with location display data and its consuming request
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentDetails {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub current_floor_name: Option<String>,
    pub current_room_name: Option<String>,
    pub assigned_request: Option<AssignedRequestSummary>,
}

/// Optional filters for the equipment list view
#[derive(Debug, Default, Clone)]
pub struct EquipmentFilter {
    pub equipment_type: Option<EquipmentType>,
    pub status: Option<EquipmentStatus>,
    pub floor_id: Option<Uuid>,
}
