//! Unauthenticated read-only views used by shareable guest pages.

use axum::extract::State;
use axum::Json;
use sprezzia_core::types::DbId;
use sprezzia_db::models::guest::PublicGuest;
use sprezzia_db::models::project::PublicProject;
use sprezzia_db::repositories::guest_repo::GuestOrder;
use sprezzia_db::repositories::{GuestRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::path::PathParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/public/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    PathParams(id): PathParams<DbId>,
) -> AppResult<Json<DataResponse<PublicProject>>> {
    let project = ProjectRepo::find_public(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// GET /api/v1/public/projects/{id}/guests
///
/// Guests and companions sorted by name. Phone numbers are never exposed.
pub async fn list_guests(
    State(state): State<AppState>,
    PathParams(id): PathParams<DbId>,
) -> AppResult<Json<DataResponse<Vec<PublicGuest>>>> {
    if ProjectRepo::find_public(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found("Project", id));
    }
    let guests = GuestRepo::list_with_companions(&state.pool, id, GuestOrder::Name)
        .await?
        .into_iter()
        .map(PublicGuest::from)
        .collect();
    Ok(Json(DataResponse { data: guests }))
}
