//! Directory lookups: floors and rooms. Read-only reference data the
//! dispatch core resolves for display.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::location::{Floor, RoomFilter, RoomSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct DirectoryService {
    repository: Repository,
}

impl DirectoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_floors(&self) -> AppResult<Vec<Floor>> {
        self.repository.locations.list_floors().await
    }

    pub async fn get_floor(&self, id: Uuid) -> AppResult<Floor> {
        self.repository.locations.get_floor(id).await
    }

    pub async fn list_rooms(&self, filter: &RoomFilter) -> AppResult<Vec<RoomSummary>> {
        self.repository.locations.list_rooms(filter).await
    }

    pub async fn search_rooms(
        &self,
        search: &str,
        floor_id: Option<Uuid>,
    ) -> AppResult<Vec<RoomSummary>> {
        self.repository.locations.search_rooms(search, floor_id).await
    }

    pub async fn get_room(&self, id: Uuid) -> AppResult<RoomSummary> {
        self.repository.locations.get_room(id).await
    }
}
