use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::models::Category;
use crate::modules::persistence::CategoryRepository;

/// Service for category operations
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// List all categories
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.categories.list().await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get category by id
    pub async fn get(&self, id: Uuid) -> Result<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::persistence::memory::MemoryStore;

    #[tokio::test]
    async fn test_list_returns_seeded_categories_by_name() {
        let service = CategoryService::new(Arc::new(MemoryStore::seeded()));

        let names: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(
            names,
            vec!["Category 1", "Category 2", "Category 3", "Category 4"]
        );
    }

    #[tokio::test]
    async fn test_get_unknown_category_is_not_found() {
        let service = CategoryService::new(Arc::new(MemoryStore::seeded()));
        assert!(matches!(
            service.get(Uuid::now_v7()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
