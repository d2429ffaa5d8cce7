//! Route definitions for the `/projects` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{project, settings};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /stats                             -> stats
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// PUT    /{id}/image                        -> upload_image
/// GET    /{id}/settings/guest-list          -> get_guest_list
/// PUT    /{id}/settings/guest-list          -> update_guest_list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/stats", get(project::stats))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/image", put(project::upload_image))
        .route(
            "/{id}/settings/guest-list",
            get(settings::get_guest_list).put(settings::update_guest_list),
        )
}
