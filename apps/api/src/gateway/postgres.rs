use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::gateway::{GatewayError, ResumeGateway};
use crate::models::record::{ResumeRow, StoredResume};
use crate::models::resume::ResumeDocument;

const RETURNING: &str = "id, user_id, document, created_at, updated_at";

impl From<sqlx::Error> for GatewayError {
    fn from(e: sqlx::Error) -> Self {
        error!("Database error: {e}");
        GatewayError::Transport(format!("database error: {e}"))
    }
}

/// Resumes stored one row per document, the document itself as JSONB.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeGateway for PgGateway {
    async fn list(&self, owner: Uuid) -> Result<Vec<StoredResume>, GatewayError> {
        let rows = sqlx::query_as::<_, ResumeRow>(&format!(
            "SELECT {RETURNING} FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(StoredResume::from).collect())
    }

    async fn get(&self, id: Uuid, owner: Uuid) -> Result<StoredResume, GatewayError> {
        let row: Option<ResumeRow> = sqlx::query_as(&format!(
            "SELECT {RETURNING} FROM resumes WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        row.map(StoredResume::from).ok_or(GatewayError::NotFound)
    }

    async fn create(
        &self,
        owner: Uuid,
        document: &ResumeDocument,
    ) -> Result<StoredResume, GatewayError> {
        let row: ResumeRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO resumes (id, user_id, document)
            VALUES ($1, $2, $3)
            RETURNING {RETURNING}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(Json(document.clone().normalized()))
        .fetch_one(&self.pool)
        .await?;

        info!("Created resume {} for user {owner}", row.id);
        Ok(row.into())
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        document: &ResumeDocument,
    ) -> Result<StoredResume, GatewayError> {
        let row: Option<ResumeRow> = sqlx::query_as(&format!(
            r#"
            UPDATE resumes
            SET document = $3, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {RETURNING}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(Json(document.clone().normalized()))
        .fetch_optional(&self.pool)
        .await?;
        row.map(StoredResume::from).ok_or(GatewayError::NotFound)
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), GatewayError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound);
        }
        info!("Deleted resume {id} for user {owner}");
        Ok(())
    }
}
