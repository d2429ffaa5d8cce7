//! Route definitions for `/projects/{id}/whatsapp`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::whatsapp;
use crate::state::AppState;

/// Routes mounted at `/projects/{id}/whatsapp`.
///
/// ```text
/// GET    /config              -> get_config
/// PUT    /config              -> update_config
/// GET    /instance            -> get_instance
/// POST   /instance            -> create_instance
/// DELETE /instance            -> delete_instance
/// POST   /instance/reconnect  -> reconnect_instance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/config",
            get(whatsapp::get_config).put(whatsapp::update_config),
        )
        .route(
            "/instance",
            get(whatsapp::get_instance)
                .post(whatsapp::create_instance)
                .delete(whatsapp::delete_instance),
        )
        .route("/instance/reconnect", post(whatsapp::reconnect_instance))
}

/// `POST /messages -> send_messages`, also mounted at `/projects/{id}/whatsapp`.
///
/// A broadcast pauses between sends and so lasts as long as the guest list
/// is long. The router mounts it outside the request timeout.
pub fn broadcast_router() -> Router<AppState> {
    Router::new().route("/messages", post(whatsapp::send_messages))
}
