//! Handlers for the `/projects` resource.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sprezzia_core::validation::{image_data_url, validate_name, validate_project_image};
use sprezzia_db::models::project::{CreateProject, Project, ProjectStats, UpdateProject};
use sprezzia_db::repositories::ProjectRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::project::ProjectAccess;
use crate::query::WorkspaceParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the cover image.
const IMAGE_FIELD: &str = "image";

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.name = validate_name("name", &input.name)?;
    input.validate()?;

    let project = ProjectRepo::create(&state.pool, &user.user_id, &input).await?;
    tracing::info!(project_id = project.id, user_id = %user.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<WorkspaceParams>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects =
        ProjectRepo::list_by_owner(&state.pool, &user.user_id, params.workspace_id.as_deref())
            .await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/stats
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<ProjectStats>>> {
    let stats = ProjectRepo::stats_by_owner(&state.pool, &user.user_id).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(access: ProjectAccess) -> AppResult<Json<DataResponse<Project>>> {
    Ok(Json(DataResponse {
        data: access.project,
    }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    access: ProjectAccess,
    Json(mut input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    if let Some(name) = input.name.as_deref() {
        input.name = Some(validate_name("name", name)?);
    }
    input.validate()?;

    let id = access.project_id();
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Removes the project together with its guests, companions, documents and
/// settings.
pub async fn delete(State(state): State<AppState>, access: ProjectAccess) -> AppResult<StatusCode> {
    let id = access.project_id();
    if ProjectRepo::delete(&state.pool, id).await? {
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Project", id))
    }
}

/// PUT /api/v1/projects/{id}/image
///
/// Multipart upload with an `image` field. The bytes are sniffed to confirm
/// they are an image and stored as a `data:` URL.
pub async fn upload_image(
    State(state): State<AppState>,
    access: ProjectAccess,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<Project>>> {
    let mut image: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            image = Some(data.to_vec());
            break;
        }
    }
    let bytes = image.ok_or_else(|| AppError::BadRequest("Missing 'image' field".into()))?;

    let format = image::guess_format(&bytes)
        .map_err(|_| AppError::BadRequest("Uploaded file is not a supported image".into()))?;
    let content_type = format.to_mime_type();
    validate_project_image(content_type, bytes.len())?;

    let data_url = image_data_url(content_type, &BASE64.encode(&bytes));
    let id = access.project_id();
    let project = ProjectRepo::set_image(&state.pool, id, &data_url)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    tracing::info!(project_id = id, content_type, size = bytes.len(), "Project image updated");
    Ok(Json(DataResponse { data: project }))
}
