use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::statuses::dtos::{StatusCountDto, StatusCountsDto, StatusResponseDto};
use crate::features::statuses::models::Status;
use crate::modules::persistence::StatusRepository;

/// Service for the workflow status directory
pub struct StatusService {
    statuses: Arc<dyn StatusRepository>,
}

impl StatusService {
    pub fn new(statuses: Arc<dyn StatusRepository>) -> Self {
        Self { statuses }
    }

    /// All statuses in display order
    pub async fn list(&self) -> Result<Vec<StatusResponseDto>> {
        let statuses = self.statuses.list().await?;
        Ok(statuses.into_iter().map(|s| s.into()).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Status> {
        self.statuses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Status '{}' not found", id)))
    }

    /// Status assigned to new ideas: the first in display order
    pub async fn default_status(&self) -> Result<Status> {
        self.statuses
            .list()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("No statuses are configured".to_string()))
    }

    /// Current idea count for every status, recomputed on each call
    pub async fn counts_by_status(&self) -> Result<StatusCountsDto> {
        let statuses = self.statuses.list().await?;
        let counts: HashMap<Uuid, i64> = self
            .statuses
            .idea_counts()
            .await?
            .into_iter()
            .map(|c| (c.status_id, c.count))
            .collect();

        let statuses: Vec<StatusCountDto> = statuses
            .into_iter()
            .map(|s| StatusCountDto {
                count: counts.get(&s.id).copied().unwrap_or(0),
                id: s.id,
                name: s.name,
                classes: s.classes,
            })
            .collect();

        Ok(StatusCountsDto {
            all: statuses.iter().map(|s| s.count).sum(),
            statuses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::persistence::memory::MemoryStore;

    #[tokio::test]
    async fn test_list_in_display_order() {
        let service = StatusService::new(Arc::new(MemoryStore::seeded()));

        let names: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();

        assert_eq!(
            names,
            vec!["Open", "Considering", "In Progress", "Implemented", "Closed"]
        );
    }

    #[tokio::test]
    async fn test_default_status_is_open() {
        let service = StatusService::new(Arc::new(MemoryStore::seeded()));
        assert_eq!(service.default_status().await.unwrap().name, "Open");
    }

    #[tokio::test]
    async fn test_counts_include_empty_statuses() {
        let service = StatusService::new(Arc::new(MemoryStore::seeded()));

        let counts = service.counts_by_status().await.unwrap();

        assert_eq!(counts.all, 0);
        assert_eq!(counts.statuses.len(), 5);
        assert!(counts.statuses.iter().all(|s| s.count == 0));
        assert_eq!(counts.count_for("All"), Some(0));
        assert_eq!(counts.count_for("Missing"), None);
    }
}
