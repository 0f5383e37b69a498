//! Business logic services

pub mod directory;
pub mod dispatch;
pub mod staff;
pub mod workload;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub dispatch: dispatch::DispatchService,
    pub workload: workload::WorkloadService,
    pub staff: staff::StaffService,
    pub directory: directory::DirectoryService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            dispatch: dispatch::DispatchService::new(repository.clone()),
            workload: workload::WorkloadService::new(repository.clone()),
            directory: directory::DirectoryService::new(repository.clone()),
            staff: staff::StaffService::new(repository, auth_config),
        }
    }
}
