//! Handlers for per-project guest list settings.

use axum::extract::State;
use axum::Json;
use sprezzia_db::models::guest_list_settings::{GuestListSettings, UpdateGuestListSettings};
use sprezzia_db::repositories::GuestListSettingsRepo;

use crate::error::AppResult;
use crate::middleware::project::ProjectAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/settings/guest-list
///
/// Every column is visible until the project saves its own settings.
pub async fn get_guest_list(
    State(state): State<AppState>,
    access: ProjectAccess,
) -> AppResult<Json<DataResponse<GuestListSettings>>> {
    let project_id = access.project_id();
    let settings = GuestListSettingsRepo::find_by_project(&state.pool, project_id)
        .await?
        .unwrap_or_else(|| GuestListSettings::defaults_for(project_id));
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/projects/{id}/settings/guest-list
pub async fn update_guest_list(
    State(state): State<AppState>,
    access: ProjectAccess,
    Json(input): Json<UpdateGuestListSettings>,
) -> AppResult<Json<DataResponse<GuestListSettings>>> {
    let settings = GuestListSettingsRepo::upsert(&state.pool, access.project_id(), &input).await?;
    Ok(Json(DataResponse { data: settings }))
}
