//! Dispatch engine: request lifecycle, equipment coupling, priority queue.
//!
//! Every operation is a stateless read-validate-write against the backing
//! store; the store transaction is the only coordination point.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{EquipmentStatus, EquipmentType, Priority, RequestStatus},
        equipment::{Equipment, EquipmentDetails, EquipmentFilter},
        request::{NewRequest, RequestDetails, RequestFilter, TransportRequest},
    },
    repository::Repository,
};

/// Input for creating a request, as received from the transport layer.
/// Priority and equipment type arrive raw and are validated here.
#[derive(Debug)]
pub struct CreateRequestInput {
    pub patient_name: Option<String>,
    pub priority: i16,
    pub equipment_type: String,
    pub pickup_room_id: Uuid,
    pub destination_room_id: Uuid,
    pub notes: Option<String>,
    pub estimated_duration_minutes: Option<i32>,
}

#[derive(Clone)]
pub struct DispatchService {
    repository: Repository,
}

impl DispatchService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new transport request in pending state. The requester is
    /// the authenticated caller, never taken from the payload.
    pub async fn create_request(
        &self,
        requester_id: Uuid,
        input: CreateRequestInput,
    ) -> AppResult<RequestDetails> {
        let priority = Priority::try_from(input.priority)?;
        let equipment_type: EquipmentType = input
            .equipment_type
            .parse()
            .map_err(AppError::Validation)?;

        if !self.repository.locations.room_exists(input.pickup_room_id).await? {
            return Err(AppError::Validation(format!(
                "Pickup room {} does not exist",
                input.pickup_room_id
            )));
        }
        if !self
            .repository
            .locations
            .room_exists(input.destination_room_id)
            .await?
        {
            return Err(AppError::Validation(format!(
                "Destination room {} does not exist",
                input.destination_room_id
            )));
        }

        let created = self
            .repository
            .requests
            .create(&NewRequest {
                patient_name: input.patient_name,
                priority,
                equipment_type,
                pickup_room_id: input.pickup_room_id,
                destination_room_id: input.destination_room_id,
                requested_by: requester_id,
                notes: input.notes,
                estimated_duration_minutes: input.estimated_duration_minutes.unwrap_or(30),
            })
            .await?;

        tracing::info!(
            request_id = %created.id,
            priority = %priority,
            equipment_type = %equipment_type,
            "request created"
        );

        self.repository.requests.get_details(created.id).await
    }

    /// List requests with optional filters, newest first
    pub async fn list_requests(&self, filter: &RequestFilter) -> AppResult<Vec<RequestDetails>> {
        self.repository.requests.list(filter).await
    }

    /// Get a request with joined display data
    pub async fn get_request(&self, id: Uuid) -> AppResult<RequestDetails> {
        self.repository.requests.get_details(id).await
    }

    /// Active work queue for a user, STAT first and FIFO within a tier
    pub async fn list_active_for_user(&self, user_id: Uuid) -> AppResult<Vec<RequestDetails>> {
        self.repository.requests.list_active_for_user(user_id).await
    }

    /// All requests created by the user, newest first
    pub async fn list_requested_by(&self, user_id: Uuid) -> AppResult<Vec<RequestDetails>> {
        self.repository
            .requests
            .list(&RequestFilter {
                requested_by: Some(user_id),
                ..Default::default()
            })
            .await
    }

    /// All requests assigned to the user, newest first
    pub async fn list_assigned_to(&self, user_id: Uuid) -> AppResult<Vec<RequestDetails>> {
        self.repository
            .requests
            .list(&RequestFilter {
                assigned_to: Some(user_id),
                ..Default::default()
            })
            .await
    }

    /// Advance a request to a target status. Cancellation is routed
    /// through cancel_request so coupled equipment is released.
    pub async fn advance_status(&self, id: Uuid, target: &str) -> AppResult<TransportRequest> {
        let target: RequestStatus = target.parse().map_err(AppError::Validation)?;

        if target == RequestStatus::Cancelled {
            return self.cancel_request(id).await;
        }

        let updated = self.repository.requests.advance_status(id, target).await?;

        tracing::info!(request_id = %id, status = %target, "request status advanced");
        Ok(updated)
    }

    /// Assign a request to a staff member, optionally coupling equipment.
    /// Both writes commit atomically or not at all.
    pub async fn assign_request(
        &self,
        id: Uuid,
        assignee_id: Uuid,
        equipment_id: Option<Uuid>,
    ) -> AppResult<RequestDetails> {
        let updated = self
            .repository
            .requests
            .assign(id, assignee_id, equipment_id)
            .await?;

        tracing::info!(
            request_id = %id,
            assignee_id = %assignee_id,
            equipment_id = ?equipment_id,
            "request assigned"
        );

        self.repository.requests.get_details(updated.id).await
    }

    /// Cancel a request, releasing any equipment the engine coupled to it
    pub async fn cancel_request(&self, id: Uuid) -> AppResult<TransportRequest> {
        let cancelled = self.repository.requests.cancel(id).await?;

        tracing::info!(request_id = %id, "request cancelled");
        Ok(cancelled)
    }

    // ------------------------------------------------------------------
    // Equipment registry
    // ------------------------------------------------------------------

    /// List equipment with optional filters
    pub async fn list_equipment(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list(filter).await
    }

    /// Available units on the caller's floor
    pub async fn nearby_equipment(
        &self,
        floor_id: Uuid,
        equipment_type: Option<EquipmentType>,
    ) -> AppResult<Vec<Equipment>> {
        self.repository
            .equipment
            .list_available_on_floor(floor_id, equipment_type)
            .await
    }

    /// Search equipment by code with optional type/status filters
    pub async fn search_equipment(
        &self,
        code: Option<&str>,
        equipment_type: Option<EquipmentType>,
        status: Option<EquipmentStatus>,
    ) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.search(code, equipment_type, status).await
    }

    /// Equipment with location names and its consuming request
    pub async fn get_equipment(&self, id: Uuid) -> AppResult<EquipmentDetails> {
        self.repository.equipment.get_details(id).await
    }

    /// External equipment status flip. in_use belongs to request
    /// assignment and cannot be set here.
    pub async fn update_equipment_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> AppResult<Equipment> {
        let status: EquipmentStatus = status.parse().map_err(AppError::Validation)?;

        if status == EquipmentStatus::InUse {
            return Err(AppError::Validation(
                "Status in_use is set by request assignment, not directly".to_string(),
            ));
        }

        let updated = self.repository.equipment.update_status(id, status).await?;

        tracing::info!(equipment_id = %id, status = %status, "equipment status updated");
        Ok(updated)
    }
}
