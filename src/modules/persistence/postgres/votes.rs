use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::models::User;
use crate::modules::persistence::VoteRepository;

#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    async fn insert(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool> {
        // The primary key on (user_id, idea_id) serializes concurrent votes
        let result = sqlx::query(
            r#"
            INSERT INTO votes (user_id, idea_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, idea_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(idea_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Idea deleted since the caller looked it up
            if e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_foreign_key_violation())
            {
                return AppError::NotFound("Idea not found".to_string());
            }
            tracing::error!("Failed to insert vote: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM votes
            WHERE user_id = $1 AND idea_id = $2
            "#,
        )
        .bind(user_id)
        .bind(idea_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete vote: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn exists(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM votes WHERE user_id = $1 AND idea_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(idea_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check vote: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn count(&self, idea_id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM votes WHERE idea_id = $1")
            .bind(idea_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count votes: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn voters(&self, idea_id: Uuid) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.name, u.password_hash, u.role, u.created_at
            FROM votes v
            JOIN users u ON u.id = v.user_id
            WHERE v.idea_id = $1
            ORDER BY v.created_at
            "#,
        )
        .bind(idea_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list voters: {:?}", e);
            AppError::Database(e)
        })
    }
}
