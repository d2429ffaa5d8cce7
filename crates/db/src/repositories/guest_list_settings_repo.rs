//! Repository for the `guest_list_settings` table (one row per project).

use sprezzia_core::types::DbId;
use sqlx::PgPool;

use crate::models::guest_list_settings::{GuestListSettings, UpdateGuestListSettings};

const COLUMNS: &str = "project_id, show_phone, show_status, show_companions, show_message_status";

pub struct GuestListSettingsRepo;

impl GuestListSettingsRepo {
    /// Stored settings, or `None` if the project never saved any.
    pub async fn find_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<GuestListSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guest_list_settings WHERE project_id = $1");
        sqlx::query_as::<_, GuestListSettings>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update. Flags left as `None` keep their stored value, or
    /// `true` on first save.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        input: &UpdateGuestListSettings,
    ) -> Result<GuestListSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO guest_list_settings
                (project_id, show_phone, show_status, show_companions, show_message_status)
             VALUES ($1, COALESCE($2, TRUE), COALESCE($3, TRUE), COALESCE($4, TRUE), COALESCE($5, TRUE))
             ON CONFLICT (project_id) DO UPDATE SET
                show_phone = COALESCE($2, guest_list_settings.show_phone),
                show_status = COALESCE($3, guest_list_settings.show_status),
                show_companions = COALESCE($4, guest_list_settings.show_companions),
                show_message_status = COALESCE($5, guest_list_settings.show_message_status)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GuestListSettings>(&query)
            .bind(project_id)
            .bind(input.show_phone)
            .bind(input.show_status)
            .bind(input.show_companions)
            .bind(input.show_message_status)
            .fetch_one(pool)
            .await
    }
}
