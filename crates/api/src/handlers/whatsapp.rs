//! Handlers for the project's WhatsApp template, gateway instance and
//! broadcasts.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sprezzia_core::messaging::{MessageBody, MessageTemplate, SendSummary, TargetAudience};
use sprezzia_core::status::GuestStatus;
use sprezzia_db::models::whatsapp_config::UpsertWhatsAppConfig;
use sprezzia_db::repositories::{GuestRepo, WhatsAppConfigRepo};
use sprezzia_evolution::{ConnectionState, EvolutionError, QrCode};
use validator::Validate;

use crate::engine::broadcast::Broadcast;
use crate::error::AppResult;
use crate::middleware::project::ProjectAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// Template as shown to the client; empty strings when never saved.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub introduction: String,
    pub conclusion: String,
}

#[derive(Debug, Serialize)]
pub struct InstanceStatus {
    pub instance_name: String,
    pub state: ConnectionState,
}

#[derive(Debug, Serialize)]
pub struct InstanceQrCode {
    pub instance_name: String,
    pub qrcode: QrCode,
}

/// Broadcast request. `simple_message` wins over `template`; with neither,
/// the project's saved template is used.
#[derive(Debug, Deserialize)]
pub struct SendMessagesRequest {
    #[serde(default)]
    pub target: TargetAudience,
    pub simple_message: Option<String>,
    pub template: Option<MessageTemplate>,
}

#[derive(Debug, Serialize)]
pub struct SendMessagesResponse {
    pub summary: SendSummary,
}

/// GET /api/v1/projects/{id}/whatsapp/config
pub async fn get_config(
    State(state): State<AppState>,
    access: ProjectAccess,
) -> AppResult<Json<DataResponse<ConfigResponse>>> {
    let config = WhatsAppConfigRepo::find_by_project(&state.pool, access.project_id()).await?;
    let data = match config {
        Some(c) => ConfigResponse {
            introduction: c.introduction,
            conclusion: c.conclusion,
        },
        None => ConfigResponse {
            introduction: String::new(),
            conclusion: String::new(),
        },
    };
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/projects/{id}/whatsapp/config
pub async fn update_config(
    State(state): State<AppState>,
    access: ProjectAccess,
    Json(input): Json<UpsertWhatsAppConfig>,
) -> AppResult<Json<DataResponse<ConfigResponse>>> {
    input.validate()?;
    let config = WhatsAppConfigRepo::upsert(&state.pool, access.project_id(), &input).await?;
    Ok(Json(DataResponse {
        data: ConfigResponse {
            introduction: config.introduction,
            conclusion: config.conclusion,
        },
    }))
}

/// GET /api/v1/projects/{id}/whatsapp/instance
///
/// An instance the gateway does not know about reports `unknown`.
pub async fn get_instance(
    State(state): State<AppState>,
    access: ProjectAccess,
) -> AppResult<Json<DataResponse<InstanceStatus>>> {
    let instance_name = state.instance_name(access.project_id());
    let connection = match state.gateway.connection_state(&instance_name).await {
        Ok(connection) => connection,
        Err(EvolutionError::Api { status: 404, .. }) => ConnectionState::Unknown,
        Err(e) => return Err(e.into()),
    };
    Ok(Json(DataResponse {
        data: InstanceStatus {
            instance_name,
            state: connection,
        },
    }))
}

/// POST /api/v1/projects/{id}/whatsapp/instance
///
/// Creates the project's instance (reusing it if it already exists) and
/// returns a QR code to pair a phone.
pub async fn create_instance(
    State(state): State<AppState>,
    access: ProjectAccess,
) -> AppResult<(StatusCode, Json<DataResponse<InstanceQrCode>>)> {
    let instance_name = state.instance_name(access.project_id());
    let created = match state.gateway.create_instance(&instance_name).await {
        Ok(qrcode) => Some(qrcode),
        Err(e) if e.is_already_exists() => {
            tracing::info!(instance = %instance_name, "Instance already exists, reconnecting");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let qrcode = match created.filter(|qr| !qr.is_empty()) {
        Some(qrcode) => qrcode,
        None => state.gateway.connect(&instance_name).await?,
    };
    tracing::info!(project_id = access.project_id(), instance = %instance_name, "WhatsApp instance ready for pairing");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: InstanceQrCode {
                instance_name,
                qrcode,
            },
        }),
    ))
}

/// POST /api/v1/projects/{id}/whatsapp/instance/reconnect
///
/// Logs the current phone out and returns a fresh QR code.
pub async fn reconnect_instance(
    State(state): State<AppState>,
    access: ProjectAccess,
) -> AppResult<Json<DataResponse<InstanceQrCode>>> {
    let instance_name = state.instance_name(access.project_id());
    if let Err(e) = state.gateway.logout(&instance_name).await {
        tracing::warn!(instance = %instance_name, error = %e, "Logout before reconnect failed");
    }
    let qrcode = state.gateway.connect(&instance_name).await?;
    Ok(Json(DataResponse {
        data: InstanceQrCode {
            instance_name,
            qrcode,
        },
    }))
}

/// DELETE /api/v1/projects/{id}/whatsapp/instance
pub async fn delete_instance(
    State(state): State<AppState>,
    access: ProjectAccess,
) -> AppResult<StatusCode> {
    let instance_name = state.instance_name(access.project_id());
    if let Err(e) = state.gateway.logout(&instance_name).await {
        tracing::warn!(instance = %instance_name, error = %e, "Logout before delete failed");
    }
    state.gateway.delete_instance(&instance_name).await?;
    tracing::info!(project_id = access.project_id(), instance = %instance_name, "WhatsApp instance deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/whatsapp/messages
///
/// Sends to every selected guest in sequence and returns the tally. The
/// request stays open for the whole broadcast.
pub async fn send_messages(
    State(state): State<AppState>,
    access: ProjectAccess,
    Json(input): Json<SendMessagesRequest>,
) -> AppResult<Json<SendMessagesResponse>> {
    let project_id = access.project_id();

    let stored = WhatsAppConfigRepo::find_by_project(&state.pool, project_id)
        .await?
        .map(|c| c.template());
    let body = MessageBody::resolve(input.simple_message, input.template, stored)?;

    let only_status = match input.target {
        TargetAudience::All => None,
        TargetAudience::Pending => Some(GuestStatus::Pendente),
    };
    let guests = GuestRepo::list_for_broadcast(&state.pool, project_id, only_status).await?;

    let instance_name = state.instance_name(project_id);
    tracing::info!(
        project_id,
        instance = %instance_name,
        guests = guests.len(),
        target = ?input.target,
        "Starting WhatsApp broadcast",
    );

    let broadcast = Broadcast {
        pool: &state.pool,
        gateway: state.gateway.as_ref(),
        instance: &instance_name,
        body: &body,
        delay: Duration::from_millis(state.config.whatsapp_send_delay_ms),
    };
    let summary = broadcast.run(guests).await;

    Ok(Json(SendMessagesResponse { summary }))
}
