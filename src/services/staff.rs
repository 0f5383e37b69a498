//! Authentication and staff management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::{Role, StaffStatus},
        staff::{CreateStaff, Staff, StaffClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct StaffService {
    repository: Repository,
    config: AuthConfig,
}

impl StaffService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by employee code and return a JWT token with the
    /// staff profile
    pub async fn authenticate(
        &self,
        employee_code: &str,
        password: &str,
    ) -> AppResult<(String, Staff)> {
        let member = self
            .repository
            .staff
            .get_by_employee_code(employee_code)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Invalid employee code or password".to_string())
            })?;

        if !self.verify_password(&member, password)? {
            return Err(AppError::Authentication(
                "Invalid employee code or password".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = StaffClaims {
            sub: member.employee_code.clone(),
            user_id: member.id,
            role: member.role,
            exp,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, member))
    }

    /// Get staff member by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Staff> {
        self.repository.staff.get_by_id(id).await
    }

    /// List staff with optional role/status filters
    pub async fn list(
        &self,
        role: Option<Role>,
        status: Option<StaffStatus>,
    ) -> AppResult<Vec<Staff>> {
        self.repository.staff.list(role, status).await
    }

    /// Create a new staff member (admin operation)
    pub async fn create(&self, input: CreateStaff) -> AppResult<Staff> {
        if self
            .repository
            .staff
            .employee_code_exists(&input.employee_code)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Employee code {} already exists",
                input.employee_code
            )));
        }

        let password_hash = Self::hash_password(&input.password)?;

        let member = self
            .repository
            .staff
            .create(
                &input.employee_code,
                &input.full_name,
                input.role,
                input.phone.as_deref(),
                &password_hash,
            )
            .await?;

        tracing::info!(staff_id = %member.id, role = %member.role, "staff member created");
        Ok(member)
    }

    fn verify_password(&self, member: &Staff, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(&member.password_hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }
}
