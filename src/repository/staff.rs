//! Staff repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{Role, StaffStatus},
        staff::Staff,
    },
};

#[derive(Clone)]
pub struct StaffRepository {
    pool: Pool<Postgres>,
}

impl StaffRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get staff member by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Staff> {
        sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff member {} not found", id)))
    }

    /// Get staff member by employee code (authentication lookup)
    pub async fn get_by_employee_code(&self, employee_code: &str) -> AppResult<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT * FROM staff WHERE LOWER(employee_code) = LOWER($1)",
        )
        .bind(employee_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    /// Check if employee code is already taken
    pub async fn employee_code_exists(&self, employee_code: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM staff WHERE LOWER(employee_code) = LOWER($1))",
        )
        .bind(employee_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// List staff with optional role/status filters, ordered by name
    pub async fn list(
        &self,
        role: Option<Role>,
        status: Option<StaffStatus>,
    ) -> AppResult<Vec<Staff>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut idx = 0;
        let mut next = || {
            idx += 1;
            idx
        };

        if role.is_some() {
            conditions.push(format!("role = ${}", next()));
        }
        if status.is_some() {
            conditions.push(format!("current_status = ${}", next()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let query = format!(
            "SELECT * FROM staff {} ORDER BY full_name ASC",
            where_clause
        );

        let mut q = sqlx::query_as::<_, Staff>(&query);
        if let Some(role) = role {
            q = q.bind(role);
        }
        if let Some(status) = status {
            q = q.bind(status);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    /// Insert a new staff member with a pre-hashed password
    pub async fn create(
        &self,
        employee_code: &str,
        full_name: &str,
        role: Role,
        phone: Option<&str>,
        password_hash: &str,
    ) -> AppResult<Staff> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            INSERT INTO staff (employee_code, full_name, role, phone, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(employee_code)
        .bind(full_name)
        .bind(role)
        .bind(phone)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(staff)
    }
}
