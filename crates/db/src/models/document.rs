//! Document entity model and DTOs.

use serde::{Deserialize, Serialize};
use sprezzia_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// Document metadata. The stored bytes are fetched separately through
/// [`DocumentContent`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub content_type: String,
    pub size_bytes: i64,
    pub url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What the download endpoint serves: inline bytes or an external link.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentContent {
    pub name: String,
    pub content_type: String,
    pub content: Option<Vec<u8>>,
    pub url: Option<String>,
}

/// Request body for uploading a document.
///
/// Exactly one of `content` (base64) and `url` must be present.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1..=200 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub content_type: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
}

/// Validated insert for the repository.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub name: String,
    pub description: Option<String>,
    pub content_type: String,
    pub source: DocumentSource,
}

#[derive(Debug, Clone)]
pub enum DocumentSource {
    Bytes(Vec<u8>),
    Url(String),
}

impl DocumentSource {
    pub fn size_bytes(&self) -> i64 {
        match self {
            DocumentSource::Bytes(bytes) => bytes.len() as i64,
            DocumentSource::Url(_) => 0,
        }
    }
}
