//! Requests repository for database operations
//!
//! All dual-entity mutations (request + equipment) run inside a single
//! transaction; partial application is never observable.

use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{EquipmentStatus, EquipmentType, Priority, RequestStatus},
        equipment::EquipmentRef,
        location::RoomRef,
        request::{NewRequest, RequestDetails, RequestFilter, TransportRequest},
        staff::StaffRef,
    },
};

/// Minimal projection of a request used by workload analytics
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RequestOutcome {
    pub status: RequestStatus,
    pub requested_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub created_at: chrono::DateTime<Utc>,
    pub completed_at: Option<chrono::DateTime<Utc>>,
}

const DETAILS_SELECT: &str = r#"
    SELECT r.*,
           pr.name as pickup_room_name, pr.room_type as pickup_room_type,
           dr.name as destination_room_name, dr.room_type as destination_room_type,
           ru.employee_code as requester_code, ru.full_name as requester_name,
           au.employee_code as assignee_code, au.full_name as assignee_name,
           e.equipment_code as unit_code, e.equipment_type as unit_type,
           e.status as unit_status, e.battery_level as unit_battery
    FROM requests r
    JOIN rooms pr ON r.pickup_room_id = pr.id
    JOIN rooms dr ON r.destination_room_id = dr.id
    JOIN staff ru ON r.requested_by = ru.id
    LEFT JOIN staff au ON r.assigned_to = au.id
    LEFT JOIN equipment e ON r.equipment_id = e.id
"#;

fn map_details(row: &PgRow) -> RequestDetails {
    let priority: Priority = row.get("priority");
    let assignee_id: Option<Uuid> = row.get("assigned_to");
    let equipment_id: Option<Uuid> = row.get("equipment_id");

    RequestDetails {
        id: row.get("id"),
        patient_name: row.get("patient_name"),
        priority,
        priority_label: priority.label(),
        equipment_type: row.get("equipment_type"),
        status: row.get("status"),
        pickup_room: RoomRef {
            id: row.get("pickup_room_id"),
            name: row.get("pickup_room_name"),
            room_type: row.get("pickup_room_type"),
        },
        destination_room: RoomRef {
            id: row.get("destination_room_id"),
            name: row.get("destination_room_name"),
            room_type: row.get("destination_room_type"),
        },
        requested_by_user: StaffRef {
            id: row.get("requested_by"),
            employee_code: row.get("requester_code"),
            full_name: row.get("requester_name"),
        },
        assigned_to_user: assignee_id.map(|id| StaffRef {
            id,
            employee_code: row.get("assignee_code"),
            full_name: row.get("assignee_name"),
        }),
        equipment: equipment_id.map(|id| EquipmentRef {
            id,
            equipment_code: row.get("unit_code"),
            equipment_type: row.get::<EquipmentType, _>("unit_type"),
            status: row.get::<EquipmentStatus, _>("unit_status"),
            battery_level: row.get("unit_battery"),
        }),
        notes: row.get("notes"),
        estimated_duration_minutes: row.get("estimated_duration_minutes"),
        created_at: row.get("created_at"),
        assigned_at: row.get("assigned_at"),
        completed_at: row.get("completed_at"),
    }
}

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a new request in pending state
    pub async fn create(&self, request: &NewRequest) -> AppResult<TransportRequest> {
        let created = sqlx::query_as::<_, TransportRequest>(
            r#"
            INSERT INTO requests (
                patient_name, priority, equipment_type, status,
                pickup_room_id, destination_room_id, requested_by,
                notes, estimated_duration_minutes
            )
            VALUES ($1, $2, $3, 'pending', $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&request.patient_name)
        .bind(request.priority)
        .bind(request.equipment_type)
        .bind(request.pickup_room_id)
        .bind(request.destination_room_id)
        .bind(request.requested_by)
        .bind(&request.notes)
        .bind(request.estimated_duration_minutes)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<TransportRequest> {
        sqlx::query_as::<_, TransportRequest>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))
    }

    /// Get request with joined display data
    pub async fn get_details(&self, id: Uuid) -> AppResult<RequestDetails> {
        let query = format!("{} WHERE r.id = $1", DETAILS_SELECT);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        Ok(map_details(&row))
    }

    /// List requests with optional filters, newest first
    pub async fn list(&self, filter: &RequestFilter) -> AppResult<Vec<RequestDetails>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut idx = 0;
        let mut next = || {
            idx += 1;
            idx
        };

        if filter.status.is_some() {
            conditions.push(format!("r.status = ${}", next()));
        }
        if filter.assigned_to.is_some() {
            conditions.push(format!("r.assigned_to = ${}", next()));
        }
        if filter.requested_by.is_some() {
            conditions.push(format!("r.requested_by = ${}", next()));
        }
        if filter.equipment_type.is_some() {
            conditions.push(format!("r.equipment_type = ${}", next()));
        }
        if filter.priority.is_some() {
            conditions.push(format!("r.priority = ${}", next()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let query = format!(
            "{} {} ORDER BY r.created_at DESC",
            DETAILS_SELECT, where_clause
        );

        let mut q = sqlx::query(&query);
        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(assigned_to) = filter.assigned_to {
            q = q.bind(assigned_to);
        }
        if let Some(requested_by) = filter.requested_by {
            q = q.bind(requested_by);
        }
        if let Some(equipment_type) = filter.equipment_type {
            q = q.bind(equipment_type);
        }
        if let Some(priority) = filter.priority {
            q = q.bind(priority);
        }

        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_details).collect())
    }

    /// Active requests (pending/queued/assigned/in_progress) where the user
    /// is requester or assignee. STAT surfaces first; FIFO within a tier.
    pub async fn list_active_for_user(&self, user_id: Uuid) -> AppResult<Vec<RequestDetails>> {
        let query = format!(
            r#"{}
            WHERE (r.requested_by = $1 OR r.assigned_to = $1)
              AND r.status IN ('pending', 'queued', 'assigned', 'in_progress')
            ORDER BY r.priority ASC, r.created_at ASC
            "#,
            DETAILS_SELECT
        );

        let rows = sqlx::query(&query).bind(user_id).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_details).collect())
    }

    /// All requests involving the user (any status), newest first
    pub async fn list_involving(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> AppResult<Vec<RequestDetails>> {
        let mut query = format!(
            r#"{}
            WHERE (r.requested_by = $1 OR r.assigned_to = $1)
            ORDER BY r.created_at DESC
            "#,
            DETAILS_SELECT
        );
        if limit.is_some() {
            query.push_str(" LIMIT $2");
        }

        let mut q = sqlx::query(&query).bind(user_id);
        if let Some(limit) = limit {
            q = q.bind(limit);
        }

        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_details).collect())
    }

    /// Advance request status. Terminal states are frozen; advancing to
    /// completed stamps completed_at, no other target ever sets it.
    pub async fn advance_status(
        &self,
        id: Uuid,
        target: RequestStatus,
    ) -> AppResult<TransportRequest> {
        let mut tx = self.pool.begin().await?;

        let current: RequestStatus =
            sqlx::query_scalar("SELECT status FROM requests WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        if current.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Request is already {} and cannot change status",
                current
            )));
        }

        let updated = if target == RequestStatus::Completed {
            sqlx::query_as::<_, TransportRequest>(
                "UPDATE requests SET status = $1, completed_at = $2 WHERE id = $3 RETURNING *",
            )
            .bind(target)
            .bind(Utc::now())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_as::<_, TransportRequest>(
                "UPDATE requests SET status = $1 WHERE id = $2 RETURNING *",
            )
            .bind(target)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;
        Ok(updated)
    }

    /// Assign a request to a staff member, optionally coupling an
    /// equipment unit. The request write and the equipment flip commit as
    /// one transaction: the equipment row is locked, racing assigns fail
    /// with a conflict instead of double-assigning, and neither write is
    /// observable unless both succeed.
    pub async fn assign(
        &self,
        id: Uuid,
        assignee_id: Uuid,
        equipment_id: Option<Uuid>,
    ) -> AppResult<TransportRequest> {
        let mut tx = self.pool.begin().await?;

        let current: RequestStatus =
            sqlx::query_scalar("SELECT status FROM requests WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        if current.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Cannot assign a {} request",
                current
            )));
        }

        let assignee_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM staff WHERE id = $1)")
                .bind(assignee_id)
                .fetch_one(&mut *tx)
                .await?;
        if !assignee_exists {
            return Err(AppError::NotFound(format!(
                "Staff member {} not found",
                assignee_id
            )));
        }

        if let Some(equipment_id) = equipment_id {
            let status: EquipmentStatus =
                sqlx::query_scalar("SELECT status FROM equipment WHERE id = $1 FOR UPDATE")
                    .bind(equipment_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Equipment {} not found", equipment_id))
                    })?;

            if status != EquipmentStatus::Available {
                return Err(AppError::Conflict(format!(
                    "Equipment {} is {}, not available",
                    equipment_id, status
                )));
            }

            sqlx::query(
                "UPDATE equipment SET status = 'in_use', assigned_request_id = $1 WHERE id = $2",
            )
            .bind(id)
            .bind(equipment_id)
            .execute(&mut *tx)
            .await?;
        }

        let updated = sqlx::query_as::<_, TransportRequest>(
            r#"
            UPDATE requests
            SET assigned_to = $1,
                equipment_id = COALESCE($2, equipment_id),
                status = 'assigned',
                assigned_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(assignee_id)
        .bind(equipment_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Cancel a request. Idempotent on an already-cancelled request;
    /// fails on a completed one. Equipment this engine put in use for the
    /// request is released in the same transaction; externally-set
    /// charging/maintenance states are left alone.
    pub async fn cancel(&self, id: Uuid) -> AppResult<TransportRequest> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, TransportRequest>(
            "SELECT * FROM requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        match request.status {
            RequestStatus::Cancelled => {
                tx.commit().await?;
                return Ok(request);
            }
            RequestStatus::Completed => {
                return Err(AppError::Conflict(
                    "Cannot cancel a completed request".to_string(),
                ));
            }
            _ => {}
        }

        let updated = sqlx::query_as::<_, TransportRequest>(
            "UPDATE requests SET status = 'cancelled' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(equipment_id) = request.equipment_id {
            sqlx::query(
                r#"
                UPDATE equipment
                SET status = 'available', assigned_request_id = NULL
                WHERE id = $1 AND status = 'in_use' AND assigned_request_id = $2
                "#,
            )
            .bind(equipment_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// All request outcomes for analytics. Always recomputed from here;
    /// the denormalized counter on staff is never trusted.
    pub async fn fetch_outcomes(&self) -> AppResult<Vec<RequestOutcome>> {
        let outcomes = sqlx::query_as::<_, RequestOutcome>(
            "SELECT status, requested_by, assigned_to, created_at, completed_at FROM requests",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(outcomes)
    }

    /// Status counts for requests assigned to one user
    pub async fn fetch_assigned_statuses(&self, user_id: Uuid) -> AppResult<Vec<RequestStatus>> {
        let statuses = sqlx::query_scalar::<_, RequestStatus>(
            "SELECT status FROM requests WHERE assigned_to = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(statuses)
    }
}
