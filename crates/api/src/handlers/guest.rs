//! Handlers for guests, their companions, RSVP actions and CSV import/export.

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use sprezzia_core::guest_csv::{build_guest_csv, parse_guest_csv, GuestCsvRecord};
use sprezzia_core::stats::GuestStats;
use sprezzia_core::status::{BulkAction, GuestStatus};
use sprezzia_core::types::DbId;
use sprezzia_core::validation::{validate_companion_name, validate_name};
use sprezzia_db::models::guest::{
    Companion, CreateGuest, Guest, GuestWithCompanions, ImportReport, UpdateGuestContact,
};
use sprezzia_db::repositories::guest_repo::GuestOrder;
use sprezzia_db::repositories::{CompanionRepo, GuestRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::path::PathParams;
use crate::middleware::project::ProjectAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the CSV upload.
const IMPORT_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: GuestStatus,
}

#[derive(Debug, Deserialize)]
pub struct BulkActionRequest {
    pub action: String,
}

/// Trim names, drop blank phones, and run the DTO validators.
fn normalize_guest(mut input: CreateGuest) -> AppResult<CreateGuest> {
    input.name = validate_name("name", &input.name)?;
    input.phone = normalize_optional(input.phone);
    input.observations = normalize_optional(input.observations);
    for companion in &mut input.companions {
        companion.name = validate_companion_name("companion name", &companion.name)?;
    }
    input.validate()?;
    Ok(input)
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /api/v1/projects/{id}/guests
pub async fn list(
    State(state): State<AppState>,
    access: ProjectAccess,
) -> AppResult<Json<DataResponse<Vec<GuestWithCompanions>>>> {
    let guests =
        GuestRepo::list_with_companions(&state.pool, access.project_id(), GuestOrder::Newest)
            .await?;
    Ok(Json(DataResponse { data: guests }))
}

/// POST /api/v1/projects/{id}/guests
pub async fn create(
    State(state): State<AppState>,
    access: ProjectAccess,
    Json(input): Json<CreateGuest>,
) -> AppResult<(StatusCode, Json<DataResponse<GuestWithCompanions>>)> {
    let input = normalize_guest(input)?;
    let created =
        GuestRepo::create_with_companions(&state.pool, access.project_id(), &input).await?;
    tracing::info!(
        project_id = access.project_id(),
        guest_id = created.guest.id,
        companions = created.companions.len(),
        "Guest created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/projects/{id}/guests/stats
pub async fn stats(
    State(state): State<AppState>,
    access: ProjectAccess,
) -> AppResult<Json<DataResponse<GuestStats>>> {
    let stats = GuestRepo::stats(&state.pool, access.project_id()).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/projects/{id}/guests/{guest_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    access: ProjectAccess,
    PathParams((_, guest_id)): PathParams<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<GuestWithCompanions>>> {
    let guest = GuestRepo::find_with_companions(&state.pool, access.project_id(), guest_id)
        .await?
        .ok_or(AppError::not_found("Guest", guest_id))?;
    Ok(Json(DataResponse { data: guest }))
}

/// PUT /api/v1/projects/{id}/guests/{guest_id}
///
/// Full update. The submitted companion list replaces the stored one;
/// companions resubmitted with their `id` are updated in place.
pub async fn replace(
    State(state): State<AppState>,
    access: ProjectAccess,
    PathParams((_, guest_id)): PathParams<(DbId, DbId)>,
    Json(input): Json<CreateGuest>,
) -> AppResult<Json<DataResponse<GuestWithCompanions>>> {
    let input = normalize_guest(input)?;
    let guest = GuestRepo::replace(&state.pool, access.project_id(), guest_id, &input)
        .await?
        .ok_or(AppError::not_found("Guest", guest_id))?;
    Ok(Json(DataResponse { data: guest }))
}

/// PATCH /api/v1/projects/{id}/guests/{guest_id}
///
/// Contact-only update (name and/or phone).
pub async fn update_contact(
    State(state): State<AppState>,
    access: ProjectAccess,
    PathParams((_, guest_id)): PathParams<(DbId, DbId)>,
    Json(mut input): Json<UpdateGuestContact>,
) -> AppResult<Json<DataResponse<Guest>>> {
    if let Some(name) = input.name.as_deref() {
        input.name = Some(validate_name("name", name)?);
    }
    // Blank clears the phone; the repository stores it as NULL.
    input.phone = input.phone.map(|p| p.trim().to_string());
    input.validate()?;

    let guest = GuestRepo::update_contact(&state.pool, access.project_id(), guest_id, &input)
        .await?
        .ok_or(AppError::not_found("Guest", guest_id))?;
    Ok(Json(DataResponse { data: guest }))
}

/// DELETE /api/v1/projects/{id}/guests/{guest_id}
pub async fn delete(
    State(state): State<AppState>,
    access: ProjectAccess,
    PathParams((_, guest_id)): PathParams<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if GuestRepo::delete(&state.pool, access.project_id(), guest_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Guest", guest_id))
    }
}

/// PATCH /api/v1/projects/{id}/guests/{guest_id}/status
pub async fn set_status(
    State(state): State<AppState>,
    access: ProjectAccess,
    PathParams((_, guest_id)): PathParams<(DbId, DbId)>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<Guest>>> {
    let guest = GuestRepo::set_status(&state.pool, access.project_id(), guest_id, input.status)
        .await?
        .ok_or(AppError::not_found("Guest", guest_id))?;
    Ok(Json(DataResponse { data: guest }))
}

/// POST /api/v1/projects/{id}/guests/{guest_id}/bulk-action
///
/// `confirm` or `decline` the guest together with every companion.
pub async fn bulk_action(
    State(state): State<AppState>,
    access: ProjectAccess,
    PathParams((_, guest_id)): PathParams<(DbId, DbId)>,
    Json(input): Json<BulkActionRequest>,
) -> AppResult<Json<DataResponse<GuestWithCompanions>>> {
    let action = BulkAction::from_str_value(input.action.trim()).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unknown action '{}'. Expected 'confirm' or 'decline'",
            input.action
        ))
    })?;

    let guest = GuestRepo::apply_bulk_status(
        &state.pool,
        access.project_id(),
        guest_id,
        action.target_status(),
    )
    .await?
    .ok_or(AppError::not_found("Guest", guest_id))?;
    Ok(Json(DataResponse { data: guest }))
}

/// PATCH /api/v1/projects/{id}/guests/{guest_id}/companions/{companion_id}/status
pub async fn set_companion_status(
    State(state): State<AppState>,
    access: ProjectAccess,
    PathParams((_, guest_id, companion_id)): PathParams<(DbId, DbId, DbId)>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<Companion>>> {
    let companion = CompanionRepo::set_status(
        &state.pool,
        access.project_id(),
        guest_id,
        companion_id,
        input.status,
    )
    .await?
    .ok_or(AppError::not_found("Companion", companion_id))?;
    Ok(Json(DataResponse { data: companion }))
}

/// POST /api/v1/projects/{id}/guests/import
///
/// Multipart upload with a `file` field in the guest CSV format. Invalid
/// rows are skipped and listed in the report.
pub async fn import(
    State(state): State<AppState>,
    access: ProjectAccess,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ImportReport>>> {
    let mut file: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some(IMPORT_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some(data.to_vec());
            break;
        }
    }
    let bytes = file.ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;

    let parsed = parse_guest_csv(&bytes)?;
    let report = GuestRepo::import_rows(&state.pool, access.project_id(), parsed).await;
    tracing::info!(
        project_id = access.project_id(),
        total_rows = report.total_rows,
        imported = report.imported,
        skipped = report.skipped,
        "Guest CSV imported",
    );
    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/projects/{id}/guests/export
pub async fn export(
    State(state): State<AppState>,
    access: ProjectAccess,
) -> AppResult<impl IntoResponse> {
    let project_id = access.project_id();
    let guests = GuestRepo::list_with_companions(&state.pool, project_id, GuestOrder::Name).await?;
    let records: Vec<GuestCsvRecord> = guests.iter().map(GuestCsvRecord::from).collect();
    let csv = build_guest_csv(&records);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"convidados-{project_id}.csv\""),
            ),
        ],
        csv,
    ))
}
