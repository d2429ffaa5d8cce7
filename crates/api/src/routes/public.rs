//! Unauthenticated routes mounted at `/public`.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// ```text
/// GET /projects/{id}         -> get_project
/// GET /projects/{id}/guests  -> list_guests
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects/{id}", get(public::get_project))
        .route("/projects/{id}/guests", get(public::list_guests))
}
