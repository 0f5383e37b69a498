//! Directory repository: floors, zones, rooms. Lookup keys only,
//! never mutated by the dispatch core.

use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::location::{Floor, RoomFilter, RoomSummary},
};

fn map_room_summary(row: &PgRow) -> RoomSummary {
    let name: String = row.get("name");
    let floor: String = row.get("floor_name");
    RoomSummary {
        id: row.get("id"),
        display_name: format!("{} - {}", name, floor),
        name,
        room_type: row.get("room_type"),
        zone: row.get("zone_name"),
        floor,
        floor_id: row.get("floor_id"),
        building: row.get("building"),
    }
}

const ROOM_SELECT: &str = r#"
    SELECT rm.id, rm.name, rm.room_type,
           z.id as zone_id, z.name as zone_name,
           f.id as floor_id, f.name as floor_name, f.building
    FROM rooms rm
    JOIN zones z ON rm.zone_id = z.id
    JOIN floors f ON z.floor_id = f.id
"#;

#[derive(Clone)]
pub struct LocationsRepository {
    pool: Pool<Postgres>,
}

impl LocationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all floors
    pub async fn list_floors(&self) -> AppResult<Vec<Floor>> {
        let floors = sqlx::query_as::<_, Floor>(
            "SELECT id, name, building FROM floors ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(floors)
    }

    /// Get floor by ID
    pub async fn get_floor(&self, id: Uuid) -> AppResult<Floor> {
        sqlx::query_as::<_, Floor>("SELECT id, name, building FROM floors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Floor {} not found", id)))
    }

    /// Check if a room exists
    pub async fn room_exists(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM rooms WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// List rooms with directory context, filtered for dropdown use
    pub async fn list_rooms(&self, filter: &RoomFilter) -> AppResult<Vec<RoomSummary>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut idx = 0;
        let mut next = || {
            idx += 1;
            idx
        };

        if filter.floor_id.is_some() {
            conditions.push(format!("f.id = ${}", next()));
        }
        if filter.zone_id.is_some() {
            conditions.push(format!("z.id = ${}", next()));
        }
        if filter.room_type.is_some() {
            conditions.push(format!("rm.room_type = ${}", next()));
        }
        if filter.search.is_some() {
            conditions.push(format!("rm.name ILIKE ${}", next()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let query = format!("{} {} ORDER BY rm.name ASC", ROOM_SELECT, where_clause);

        let mut q = sqlx::query(&query);
        if let Some(floor_id) = filter.floor_id {
            q = q.bind(floor_id);
        }
        if let Some(zone_id) = filter.zone_id {
            q = q.bind(zone_id);
        }
        if let Some(ref room_type) = filter.room_type {
            q = q.bind(room_type.clone());
        }
        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{}%", search));
        }

        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_room_summary).collect())
    }

    /// Autocomplete search, capped at 20 rows
    pub async fn search_rooms(
        &self,
        search: &str,
        floor_id: Option<Uuid>,
    ) -> AppResult<Vec<RoomSummary>> {
        let rows = if let Some(floor_id) = floor_id {
            let query = format!(
                "{} WHERE rm.name ILIKE $1 AND f.id = $2 ORDER BY rm.name ASC LIMIT 20",
                ROOM_SELECT
            );
            sqlx::query(&query)
                .bind(format!("%{}%", search))
                .bind(floor_id)
                .fetch_all(&self.pool)
                .await?
        } else {
            let query = format!(
                "{} WHERE rm.name ILIKE $1 ORDER BY rm.name ASC LIMIT 20",
                ROOM_SELECT
            );
            sqlx::query(&query)
                .bind(format!("%{}%", search))
                .fetch_all(&self.pool)
                .await?
        };

        Ok(rows.iter().map(map_room_summary).collect())
    }

    /// Get one room with directory context
    pub async fn get_room(&self, id: Uuid) -> AppResult<RoomSummary> {
        let query = format!("{} WHERE rm.id = $1", ROOM_SELECT);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", id)))?;

        Ok(map_room_summary(&row))
    }
}
