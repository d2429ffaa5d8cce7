//! The seam between the API layer and the WhatsApp gateway.

use async_trait::async_trait;

use crate::client::EvolutionClient;
use crate::error::EvolutionError;
use crate::types::{ConnectionState, QrCode};

/// Name of the gateway instance that serves a project.
pub fn instance_name(prefix: &str, project_id: i64) -> String {
    format!("{prefix}-{project_id}")
}

/// Operations the backend needs from a WhatsApp gateway.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn create_instance(&self, instance: &str) -> Result<QrCode, EvolutionError>;
    async fn connect(&self, instance: &str) -> Result<QrCode, EvolutionError>;
    async fn connection_state(&self, instance: &str) -> Result<ConnectionState, EvolutionError>;
    async fn logout(&self, instance: &str) -> Result<(), EvolutionError>;
    async fn delete_instance(&self, instance: &str) -> Result<(), EvolutionError>;
    async fn send_text(&self, instance: &str, number: &str, text: &str) -> Result<(), EvolutionError>;
}

#[async_trait]
impl MessageGateway for EvolutionClient {
    async fn create_instance(&self, instance: &str) -> Result<QrCode, EvolutionError> {
        EvolutionClient::create_instance(self, instance).await
    }

    async fn connect(&self, instance: &str) -> Result<QrCode, EvolutionError> {
        EvolutionClient::connect(self, instance).await
    }

    async fn connection_state(&self, instance: &str) -> Result<ConnectionState, EvolutionError> {
        EvolutionClient::connection_state(self, instance).await
    }

    async fn logout(&self, instance: &str) -> Result<(), EvolutionError> {
        EvolutionClient::logout(self, instance).await
    }

    async fn delete_instance(&self, instance: &str) -> Result<(), EvolutionError> {
        EvolutionClient::delete_instance(self, instance).await
    }

    async fn send_text(&self, instance: &str, number: &str, text: &str) -> Result<(), EvolutionError> {
        tracing::debug!(instance, number, "Sending WhatsApp text");
        EvolutionClient::send_text(self, instance, number, text).await
    }
}
