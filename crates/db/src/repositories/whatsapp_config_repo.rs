//! Repository for the `whatsapp_configs` table (one row per project).

use sprezzia_core::types::DbId;
use sqlx::PgPool;

use crate::models::whatsapp_config::{UpsertWhatsAppConfig, WhatsAppConfig};

const COLUMNS: &str = "id, project_id, introduction, conclusion, created_at, updated_at";

pub struct WhatsAppConfigRepo;

impl WhatsAppConfigRepo {
    pub async fn find_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<WhatsAppConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM whatsapp_configs WHERE project_id = $1");
        sqlx::query_as::<_, WhatsAppConfig>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the project's template.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        input: &UpsertWhatsAppConfig,
    ) -> Result<WhatsAppConfig, sqlx::Error> {
        let query = format!(
            "INSERT INTO whatsapp_configs (project_id, introduction, conclusion)
             VALUES ($1, $2, $3)
             ON CONFLICT (project_id) DO UPDATE SET
                introduction = EXCLUDED.introduction,
                conclusion = EXCLUDED.conclusion
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WhatsAppConfig>(&query)
            .bind(project_id)
            .bind(&input.introduction)
            .bind(&input.conclusion)
            .fetch_one(pool)
            .await
    }
}
