//! Project ownership extractor.

use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::request::Parts;
use sprezzia_core::error::CoreError;
use sprezzia_core::types::DbId;
use sprezzia_db::models::project::Project;
use sprezzia_db::repositories::ProjectRepo;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Name of the path parameter holding the project id on every
/// project-scoped route.
const PROJECT_PARAM: &str = "id";

/// The `{id}` project of the request, loaded and owned by the caller.
///
/// Authentication runs first (401); then a missing project is 404 and a
/// project owned by someone else is 403.
#[derive(Debug, Clone)]
pub struct ProjectAccess {
    pub user: AuthUser,
    pub project: Project,
}

impl ProjectAccess {
    pub fn project_id(&self) -> DbId {
        self.project.id
    }
}

impl FromRequestParts<AppState> for ProjectAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let params = RawPathParams::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let raw = params
            .iter()
            .find(|(key, _)| *key == PROJECT_PARAM)
            .map(|(_, value)| value)
            .ok_or_else(|| AppError::InternalError("Route has no project id parameter".into()))?;
        let project_id: DbId = raw
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Invalid project id '{raw}'")))?;

        let project = ProjectRepo::find_by_id(&state.pool, project_id)
            .await?
            .ok_or(AppError::not_found("Project", project_id))?;

        if project.owner_id != user.user_id {
            tracing::warn!(
                project_id,
                user_id = %user.user_id,
                "Rejected access to another user's project",
            );
            return Err(AppError::Core(CoreError::Forbidden(
                "You do not have access to this project".into(),
            )));
        }

        Ok(ProjectAccess { user, project })
    }
}
