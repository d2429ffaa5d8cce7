//! Repository for the `documents` table.

use sprezzia_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{Document, DocumentContent, DocumentSource, NewDocument};

/// Metadata columns. `content` is left out so listings stay small.
const COLUMNS: &str =
    "id, project_id, name, description, content_type, size_bytes, url, created_at, updated_at";

/// Provides CRUD operations for project documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Store a document, returning its metadata.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &NewDocument,
    ) -> Result<Document, sqlx::Error> {
        let (content, url) = match &input.source {
            DocumentSource::Bytes(bytes) => (Some(bytes.as_slice()), None),
            DocumentSource::Url(url) => (None, Some(url.as_str())),
        };
        let query = format!(
            "INSERT INTO documents
                (project_id, name, description, content_type, size_bytes, content, url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.content_type)
            .bind(input.source.size_bytes())
            .bind(content)
            .bind(url)
            .fetch_one(pool)
            .await
    }

    /// List a project's documents, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents WHERE project_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find a document's metadata within a project.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        document_id: DbId,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Document>(&query)
            .bind(document_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Load the stored bytes (or external link) for download.
    pub async fn find_content(
        pool: &PgPool,
        project_id: DbId,
        document_id: DbId,
    ) -> Result<Option<DocumentContent>, sqlx::Error> {
        sqlx::query_as::<_, DocumentContent>(
            "SELECT name, content_type, content, url FROM documents
             WHERE id = $1 AND project_id = $2",
        )
        .bind(document_id)
        .bind(project_id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a document. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, project_id: DbId, document_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND project_id = $2")
            .bind(document_id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
