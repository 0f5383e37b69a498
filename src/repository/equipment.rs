//! Equipment repository for database operations

use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{EquipmentStatus, EquipmentType},
        equipment::{AssignedRequestSummary, Equipment, EquipmentDetails, EquipmentFilter},
    },
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// List equipment with optional filters, newest first
    pub async fn list(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut idx = 0;
        let mut next = || {
            idx += 1;
            idx
        };

        if filter.equipment_type.is_some() {
            conditions.push(format!("equipment_type = ${}", next()));
        }
        if filter.status.is_some() {
            conditions.push(format!("status = ${}", next()));
        }
        if filter.floor_id.is_some() {
            conditions.push(format!("current_floor_id = ${}", next()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let query = format!(
            "SELECT * FROM equipment {} ORDER BY created_at DESC",
            where_clause
        );

        let mut q = sqlx::query_as::<_, Equipment>(&query);
        if let Some(equipment_type) = filter.equipment_type {
            q = q.bind(equipment_type);
        }
        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(floor_id) = filter.floor_id {
            q = q.bind(floor_id);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    /// Available units on a floor, optionally restricted by type
    pub async fn list_available_on_floor(
        &self,
        floor_id: Uuid,
        equipment_type: Option<EquipmentType>,
    ) -> AppResult<Vec<Equipment>> {
        let units = if let Some(equipment_type) = equipment_type {
            sqlx::query_as::<_, Equipment>(
                r#"
                SELECT * FROM equipment
                WHERE status = 'available' AND current_floor_id = $1 AND equipment_type = $2
                ORDER BY equipment_code
                "#,
            )
            .bind(floor_id)
            .bind(equipment_type)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Equipment>(
                r#"
                SELECT * FROM equipment
                WHERE status = 'available' AND current_floor_id = $1
                ORDER BY equipment_code
                "#,
            )
            .bind(floor_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(units)
    }

    /// Search equipment by code substring with optional type/status filters
    pub async fn search(
        &self,
        code: Option<&str>,
        equipment_type: Option<EquipmentType>,
        status: Option<EquipmentStatus>,
    ) -> AppResult<Vec<Equipment>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut idx = 0;
        let mut next = || {
            idx += 1;
            idx
        };

        if code.is_some() {
            conditions.push(format!("equipment_code ILIKE ${}", next()));
        }
        if equipment_type.is_some() {
            conditions.push(format!("equipment_type = ${}", next()));
        }
        if status.is_some() {
            conditions.push(format!("status = ${}", next()));
        }

        let query = format!(
            "SELECT * FROM equipment WHERE {} ORDER BY equipment_code",
            conditions.join(" AND ")
        );

        let mut q = sqlx::query_as::<_, Equipment>(&query);
        if let Some(code) = code {
            q = q.bind(format!("%{}%", code));
        }
        if let Some(equipment_type) = equipment_type {
            q = q.bind(equipment_type);
        }
        if let Some(status) = status {
            q = q.bind(status);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    /// Equipment with location names and its consuming request, if any
    pub async fn get_details(&self, id: Uuid) -> AppResult<EquipmentDetails> {
        let equipment = self.get_by_id(id).await?;

        let current_floor_name: Option<String> = match equipment.current_floor_id {
            Some(floor_id) => {
                sqlx::query_scalar("SELECT name FROM floors WHERE id = $1")
                    .bind(floor_id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => None,
        };

        let current_room_name: Option<String> = match equipment.current_room_id {
            Some(room_id) => {
                sqlx::query_scalar("SELECT name FROM rooms WHERE id = $1")
                    .bind(room_id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => None,
        };

        let assigned_request = match equipment.assigned_request_id {
            Some(request_id) => sqlx::query(
                r#"
                SELECT r.id, r.patient_name, r.priority, r.status,
                       pr.name as pickup_room_name, dr.name as destination_room_name
                FROM requests r
                JOIN rooms pr ON r.pickup_room_id = pr.id
                JOIN rooms dr ON r.destination_room_id = dr.id
                WHERE r.id = $1
                "#,
            )
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| AssignedRequestSummary {
                id: row.get("id"),
                patient_name: row.get("patient_name"),
                priority: row.get("priority"),
                status: row.get("status"),
                pickup_room_name: row.get("pickup_room_name"),
                destination_room_name: row.get("destination_room_name"),
            }),
            None => None,
        };

        Ok(EquipmentDetails {
            equipment,
            current_floor_name,
            current_room_name,
            assigned_request,
        })
    }

    /// External status flip (charging/maintenance/available). in_use is
    /// only ever set by request assignment, so leaving it here clears the
    /// assigned-request pointer and the status ⇔ assignment invariant holds.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: EquipmentStatus,
    ) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            "UPDATE equipment SET status = $1, assigned_request_id = NULL WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }
}
