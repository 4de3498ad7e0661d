use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::map_unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::ideas::models::{Idea, IdeaDetail, IdeaFilter, NewIdea};
use crate::modules::persistence::IdeaRepository;

/// Columns of `IdeaDetail`; `$1` is the viewing user (NULL for guests)
const DETAIL_SELECT: &str = r#"
    SELECT
        i.id, i.title, i.slug, i.description,
        i.category_id, c.name AS category_name,
        i.status_id, s.name AS status_name, s.classes AS status_classes,
        i.spam_reports,
        i.user_id, u.name AS author_name, u.email AS author_email,
        i.created_at,
        (SELECT COUNT(*) FROM votes v WHERE v.idea_id = i.id) AS votes_count,
        EXISTS (
            SELECT 1 FROM votes v WHERE v.idea_id = i.id AND v.user_id = $1
        ) AS voted_by_user
    FROM ideas i
    JOIN categories c ON c.id = i.category_id
    JOIN statuses s ON s.id = i.status_id
    JOIN users u ON u.id = i.user_id
"#;

#[derive(Clone)]
pub struct PgIdeaRepository {
    pool: PgPool,
}

impl PgIdeaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdeaRepository for PgIdeaRepository {
    async fn insert(&self, idea: &NewIdea) -> Result<Idea> {
        sqlx::query_as::<_, Idea>(
            r#"
            INSERT INTO ideas (id, user_id, category_id, status_id, title, slug, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, category_id, status_id, title, slug, description,
                      spam_reports, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(idea.user_id)
        .bind(idea.category_id)
        .bind(idea.status_id)
        .bind(&idea.title)
        .bind(&idea.slug)
        .bind(&idea.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                AppError::Conflict(format!("Slug '{}' is already taken", idea.slug))
            })
        })
    }

    async fn slugs_with_base(&self, base: &str) -> Result<Vec<String>> {
        // Slugs only contain [a-z0-9-], so the base needs no LIKE escaping
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT slug
            FROM ideas
            WHERE slug = $1 OR slug LIKE $1 || '-%'
            "#,
        )
        .bind(base)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up slugs: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Idea>> {
        sqlx::query_as::<_, Idea>(
            r#"
            SELECT id, user_id, category_id, status_id, title, slug, description,
                   spam_reports, created_at
            FROM ideas
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get idea by slug: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_detail(&self, id: Uuid, viewer: Option<Uuid>) -> Result<Option<IdeaDetail>> {
        let sql = format!("{} WHERE i.id = $2", DETAIL_SELECT);

        sqlx::query_as::<_, IdeaDetail>(&sql)
            .bind(viewer)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get idea detail: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list(
        &self,
        filter: &IdeaFilter,
        viewer: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<IdeaDetail>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM ideas i
            JOIN categories c ON c.id = i.category_id
            JOIN statuses s ON s.id = i.status_id
            WHERE ($1::text IS NULL OR s.name = $1)
              AND ($2::text IS NULL OR c.name = $2)
            "#,
        )
        .bind(filter.status.as_deref())
        .bind(filter.category.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count ideas: {:?}", e);
            AppError::Database(e)
        })?;

        let sql = format!(
            r#"{}
            WHERE ($2::text IS NULL OR s.name = $2)
              AND ($3::text IS NULL OR c.name = $3)
            ORDER BY i.created_at DESC, i.id DESC
            OFFSET $4 LIMIT $5
            "#,
            DETAIL_SELECT
        );

        let items = sqlx::query_as::<_, IdeaDetail>(&sql)
            .bind(viewer)
            .bind(filter.status.as_deref())
            .bind(filter.category.as_deref())
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list ideas: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    async fn update_status(&self, id: Uuid, status_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE ideas
            SET status_id = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update idea status: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn increment_spam(&self, id: Uuid) -> Result<i32> {
        sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE ideas
            SET spam_reports = spam_reports + 1
            WHERE id = $1
            RETURNING spam_reports
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to increment spam reports: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Idea not found".to_string()))
    }

    async fn reset_spam(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE ideas
            SET spam_reports = 0
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to reset spam reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        // votes and notification_jobs cascade through their foreign keys
        let result = sqlx::query("DELETE FROM ideas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete idea: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
