//! Guest list column visibility settings.

use serde::{Deserialize, Serialize};
use sprezzia_core::types::DbId;
use sqlx::FromRow;

/// A row from the `guest_list_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GuestListSettings {
    pub project_id: DbId,
    pub show_phone: bool,
    pub show_status: bool,
    pub show_companions: bool,
    pub show_message_status: bool,
}

impl GuestListSettings {
    /// Settings reported for a project that never saved any.
    pub fn defaults_for(project_id: DbId) -> Self {
        Self {
            project_id,
            show_phone: true,
            show_status: true,
            show_companions: true,
            show_message_status: true,
        }
    }
}

/// Upsert body. Omitted flags keep their stored value (or the default).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGuestListSettings {
    pub show_phone: Option<bool>,
    pub show_status: Option<bool>,
    pub show_companions: Option<bool>,
    pub show_message_status: Option<bool>,
}
