//! WardFlow Hospital Transport Dispatch System
//!
//! A Rust implementation of the WardFlow dispatch server, providing a
//! REST JSON API for coordinating mobile medical equipment between staff
//! transport requests and the equipment pool.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
