//! Route definitions for `/projects/{id}/guests`.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::guest;
use crate::state::AppState;

/// Routes mounted at `/projects/{id}/guests`.
///
/// ```text
/// GET    /                                              -> list
/// POST   /                                              -> create
/// GET    /stats                                         -> stats
/// POST   /import                                        -> import
/// GET    /export                                        -> export
/// GET    /{guest_id}                                    -> get_by_id
/// PUT    /{guest_id}                                    -> replace
/// PATCH  /{guest_id}                                    -> update_contact
/// DELETE /{guest_id}                                    -> delete
/// PATCH  /{guest_id}/status                             -> set_status
/// POST   /{guest_id}/bulk-action                        -> bulk_action
/// PATCH  /{guest_id}/companions/{companion_id}/status   -> set_companion_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(guest::list).post(guest::create))
        .route("/stats", get(guest::stats))
        .route("/import", post(guest::import))
        .route("/export", get(guest::export))
        .route(
            "/{guest_id}",
            get(guest::get_by_id)
                .put(guest::replace)
                .patch(guest::update_contact)
                .delete(guest::delete),
        )
        .route("/{guest_id}/status", patch(guest::set_status))
        .route("/{guest_id}/bulk-action", post(guest::bulk_action))
        .route(
            "/{guest_id}/companions/{companion_id}/status",
            patch(guest::set_companion_status),
        )
}
