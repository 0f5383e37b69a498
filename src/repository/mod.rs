//! Repository layer for database operations
//!
//! The pool handle is injected at construction and owned by the process
//! entry point; engines never reach for process-global state.

pub mod equipment;
pub mod locations;
pub mod requests;
pub mod staff;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub requests: requests::RequestsRepository,
    pub equipment: equipment::EquipmentRepository,
    pub staff: staff::StaffRepository,
    pub locations: locations::LocationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            requests: requests::RequestsRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            staff: staff::StaffRepository::new(pool.clone()),
            locations: locations::LocationsRepository::new(pool.clone()),
            pool,
        }
    }
}
