//! Handlers for project documents.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sprezzia_core::types::DbId;
use sprezzia_core::validation::{
    is_inline_content_type, validate_content_type, validate_document_size, validate_document_url,
    validate_name, DEFAULT_DOCUMENT_CONTENT_TYPE,
};
use sprezzia_db::models::document::{
    CreateDocumentRequest, Document, DocumentSource, NewDocument,
};
use sprezzia_db::repositories::DocumentRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::path::PathParams;
use crate::middleware::project::ProjectAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// Split an optional `data:<type>;base64,` prefix off an upload.
fn split_data_url(content: &str) -> (Option<&str>, &str) {
    if let Some(rest) = content.strip_prefix("data:") {
        if let Some((meta, payload)) = rest.split_once(',') {
            let content_type = meta.strip_suffix(";base64").unwrap_or(meta);
            return (Some(content_type).filter(|t| !t.is_empty()), payload);
        }
    }
    (None, content)
}

/// Turn the request body into a repository insert.
fn build_document(input: CreateDocumentRequest) -> AppResult<NewDocument> {
    let name = validate_name("name", &input.name)?;
    let requested_type = input
        .content_type
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let (source, sniffed_type) = match (input.content.as_deref(), input.url.as_deref()) {
        (Some(content), None) => {
            let (embedded_type, payload) = split_data_url(content.trim());
            let bytes = BASE64
                .decode(payload.trim())
                .map_err(|_| AppError::BadRequest("content must be base64 encoded".into()))?;
            validate_document_size(bytes.len())?;
            (DocumentSource::Bytes(bytes), embedded_type.map(String::from))
        }
        (None, Some(url)) => {
            validate_document_url(url)?;
            (DocumentSource::Url(url.trim().to_string()), None)
        }
        _ => {
            return Err(AppError::BadRequest(
                "Provide exactly one of 'content' or 'url'".into(),
            ))
        }
    };

    let content_type = match requested_type.or(sniffed_type) {
        Some(content_type) => validate_content_type(&content_type)?,
        None => DEFAULT_DOCUMENT_CONTENT_TYPE.to_string(),
    };

    Ok(NewDocument {
        name,
        description: input.description.filter(|d| !d.trim().is_empty()),
        content_type,
        source,
    })
}

/// Quote a file name for a `Content-Disposition` header.
fn disposition(inline: bool, name: &str) -> String {
    let kind = if inline { "inline" } else { "attachment" };
    let safe: String = name
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    format!("{kind}; filename=\"{safe}\"")
}

/// GET /api/v1/projects/{id}/documents
pub async fn list(
    State(state): State<AppState>,
    access: ProjectAccess,
) -> AppResult<Json<DataResponse<Vec<Document>>>> {
    let documents = DocumentRepo::list_by_project(&state.pool, access.project_id()).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// POST /api/v1/projects/{id}/documents
///
/// JSON body with either base64 `content` (optionally as a `data:` URL) or
/// an external `url`.
pub async fn create(
    State(state): State<AppState>,
    access: ProjectAccess,
    Json(input): Json<CreateDocumentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Document>>)> {
    input.validate()?;
    let new_document = build_document(input)?;
    let document = DocumentRepo::create(&state.pool, access.project_id(), &new_document).await?;
    tracing::info!(
        project_id = access.project_id(),
        document_id = document.id,
        size_bytes = document.size_bytes,
        "Document stored",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/v1/projects/{id}/documents/{doc_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    access: ProjectAccess,
    PathParams((_, document_id)): PathParams<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Document>>> {
    let document = DocumentRepo::find_by_id(&state.pool, access.project_id(), document_id)
        .await?
        .ok_or(AppError::not_found("Document", document_id))?;
    Ok(Json(DataResponse { data: document }))
}

/// GET /api/v1/projects/{id}/documents/{doc_id}/download
///
/// Common images, plain text and PDFs are served inline; everything else as
/// an attachment. Every download carries `nosniff`. Link documents redirect
/// to their URL.
pub async fn download(
    State(state): State<AppState>,
    access: ProjectAccess,
    PathParams((_, document_id)): PathParams<(DbId, DbId)>,
) -> AppResult<Response> {
    let document = DocumentRepo::find_content(&state.pool, access.project_id(), document_id)
        .await?
        .ok_or(AppError::not_found("Document", document_id))?;

    match (document.content, document.url) {
        (Some(bytes), _) => {
            let inline = is_inline_content_type(&document.content_type);
            Ok((
                [
                    (header::CONTENT_TYPE, document.content_type),
                    (
                        header::CONTENT_DISPOSITION,
                        disposition(inline, &document.name),
                    ),
                    (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
                ],
                bytes,
            )
                .into_response())
        }
        (None, Some(url)) => Ok(Redirect::temporary(&url).into_response()),
        (None, None) => Err(AppError::InternalError(format!(
            "Document {document_id} has neither content nor url"
        ))),
    }
}

/// DELETE /api/v1/projects/{id}/documents/{doc_id}
pub async fn delete(
    State(state): State<AppState>,
    access: ProjectAccess,
    PathParams((_, document_id)): PathParams<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if DocumentRepo::delete(&state.pool, access.project_id(), document_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Document", document_id))
    }
}
