//! Transport request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::{EquipmentType, Priority, RequestStatus};
use super::equipment::EquipmentRef;
use super::location::RoomRef;
use super::staff::StaffRef;

/// Transport request row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TransportRequest {
    pub id: Uuid,
    pub patient_name: Option<String>,
    pub priority: Priority,
    pub equipment_type: EquipmentType,
    pub status: RequestStatus,
    pub pickup_room_id: Uuid,
    pub destination_room_id: Uuid,
    pub requested_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub equipment_id: Option<Uuid>,
    pub notes: Option<String>,
    pub estimated_duration_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Validated input for creating a request. The requester always comes
/// from the authenticated caller, never from the payload.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub patient_name: Option<String>,
    pub priority: Priority,
    pub equipment_type: EquipmentType,
    pub pickup_room_id: Uuid,
    pub destination_room_id: Uuid,
    pub requested_by: Uuid,
    pub notes: Option<String>,
    pub estimated_duration_minutes: i32,
}

/// Request with joined display data for list and detail views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestDetails {
    pub id: Uuid,
    pub patient_name: Option<String>,
    pub priority: Priority,
    /// Presentation label derived from priority (STAT/HIGH/NORMAL/LOW)
    pub priority_label: &'static str,
    pub equipment_type: EquipmentType,
    pub status: RequestStatus,
    pub pickup_room: RoomRef,
    pub destination_room: RoomRef,
    pub requested_by_user: StaffRef,
    pub assigned_to_user: Option<StaffRef>,
    pub equipment: Option<EquipmentRef>,
    pub notes: Option<String>,
    pub estimated_duration_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Optional filters for the request list view
#[derive(Debug, Default, Clone)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub assigned_to: Option<Uuid>,
    pub requested_by: Option<Uuid>,
    pub equipment_type: Option<EquipmentType>,
    pub priority: Option<Priority>,
}
