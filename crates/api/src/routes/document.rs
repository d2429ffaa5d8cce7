//! Route definitions for `/projects/{id}/documents`.

use axum::routing::get;
use axum::Router;

use crate::handlers::document;
use crate::state::AppState;

/// Routes mounted at `/projects/{id}/documents`.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> create
/// GET    /{doc_id}           -> get_by_id
/// DELETE /{doc_id}           -> delete
/// GET    /{doc_id}/download  -> download
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(document::list).post(document::create))
        .route("/{doc_id}", get(document::get_by_id).delete(document::delete))
        .route("/{doc_id}/download", get(document::download))
}
