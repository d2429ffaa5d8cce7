//! Per-project WhatsApp message template.

use serde::{Deserialize, Serialize};
use sprezzia_core::messaging::MessageTemplate;
use sprezzia_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `whatsapp_configs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WhatsAppConfig {
    pub id: DbId,
    pub project_id: DbId,
    pub introduction: String,
    pub conclusion: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WhatsAppConfig {
    pub fn template(&self) -> MessageTemplate {
        MessageTemplate {
            introduction: self.introduction.clone(),
            conclusion: self.conclusion.clone(),
        }
    }
}

/// Upsert body. Both parts are stored as given.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertWhatsAppConfig {
    #[validate(length(max = 4000))]
    pub introduction: String,
    #[validate(length(max = 4000))]
    pub conclusion: String,
}
