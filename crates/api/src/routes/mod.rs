pub mod document;
pub mod guest;
pub mod health;
pub mod project;
pub mod public;
pub mod whatsapp;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                        list, create
/// /projects/stats                                  owner counters
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/image                             cover image upload (PUT)
/// /projects/{id}/settings/guest-list               get, upsert
///
/// /projects/{id}/guests                            list, create
/// /projects/{id}/guests/stats                      RSVP and message totals
/// /projects/{id}/guests/import                     CSV upload (POST)
/// /projects/{id}/guests/export                     CSV download (GET)
/// /projects/{id}/guests/{guest_id}                 get, replace, patch contact, delete
/// /projects/{id}/guests/{guest_id}/status          set RSVP (PATCH)
/// /projects/{id}/guests/{guest_id}/bulk-action     confirm / decline with companions (POST)
/// /projects/{id}/guests/{guest_id}/companions/{companion_id}/status   (PATCH)
///
/// /projects/{id}/documents                         list, create
/// /projects/{id}/documents/{doc_id}                get, delete
/// /projects/{id}/documents/{doc_id}/download       bytes or redirect
///
/// /projects/{id}/whatsapp/config                   get, upsert
/// /projects/{id}/whatsapp/instance                 state, create, delete
/// /projects/{id}/whatsapp/instance/reconnect       new QR code (POST)
/// /projects/{id}/whatsapp/messages                 broadcast (POST, see below)
///
/// /public/projects/{id}                            project summary (no auth)
/// /public/projects/{id}/guests                     guest list without phones (no auth)
/// ```
///
/// The broadcast route is not in this tree; it comes from
/// [`long_running_routes`] so it can run past the request timeout.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Project CRUD, image and settings.
        .nest("/projects", project::router())
        // Guest list, RSVP and CSV.
        .nest("/projects/{id}/guests", guest::router())
        // Documents.
        .nest("/projects/{id}/documents", document::router())
        // WhatsApp template and instance.
        .nest("/projects/{id}/whatsapp", whatsapp::router())
        // Unauthenticated shareable views.
        .nest("/public", public::router())
}

/// Routes whose handlers may outlast the request timeout, with their full
/// `/api/v1` paths.
pub fn long_running_routes() -> Router<AppState> {
    Router::new().nest("/api/v1/projects/{id}/whatsapp", whatsapp::broadcast_router())
}
