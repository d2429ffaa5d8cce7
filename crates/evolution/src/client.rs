//! REST client for the Evolution API.
//!
//! Every request carries the static `apikey` header. Non-2xx responses are
//! turned into [`EvolutionError::Api`] with the status and raw body.

use std::time::Duration;

use serde_json::{json, Value};

use crate::error::EvolutionError;
use crate::types::{ConnectionState, QrCode};

/// Integration engine requested when creating instances.
const INTEGRATION: &str = "WHATSAPP-BAILEYS";

/// HTTP client for one Evolution API server.
#[derive(Clone)]
pub struct EvolutionClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl EvolutionClient {
    /// Create a client for the gateway at `api_url` (e.g.
    /// `http://localhost:8080`). Requests time out after `timeout`.
    pub fn new(api_url: &str, api_key: &str, timeout: Duration) -> Result<Self, EvolutionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url, api_key))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: &str, api_key: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Register a new instance.
    ///
    /// Sends `POST /instance/create`. The response may already carry a QR
    /// code; it is returned when present.
    pub async fn create_instance(&self, instance: &str) -> Result<QrCode, EvolutionError> {
        let body = json!({
            "instanceName": instance,
            "qrcode": true,
            "integration": INTEGRATION,
        });
        let response = self
            .client
            .post(self.endpoint("/instance/create"))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let value: Value = Self::parse_response(response).await?;
        Ok(QrCode::from_response(&value))
    }

    /// Start (or resume) pairing and fetch a fresh QR code.
    ///
    /// Sends `GET /instance/connect/{instance}`.
    pub async fn connect(&self, instance: &str) -> Result<QrCode, EvolutionError> {
        let response = self
            .client
            .get(self.endpoint(&format!("/instance/connect/{instance}")))
            .header("apikey", &self.api_key)
            .send()
            .await?;

        let value: Value = Self::parse_response(response).await?;
        Ok(QrCode::from_response(&value))
    }

    /// Sends `GET /instance/connectionState/{instance}`.
    pub async fn connection_state(&self, instance: &str) -> Result<ConnectionState, EvolutionError> {
        let response = self
            .client
            .get(self.endpoint(&format!("/instance/connectionState/{instance}")))
            .header("apikey", &self.api_key)
            .send()
            .await?;

        let value: Value = Self::parse_response(response).await?;
        Ok(ConnectionState::from_response(&value))
    }

    /// Unlink the phone from the instance.
    ///
    /// Sends `DELETE /instance/logout/{instance}`.
    pub async fn logout(&self, instance: &str) -> Result<(), EvolutionError> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/instance/logout/{instance}")))
            .header("apikey", &self.api_key)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Remove the instance from the gateway.
    ///
    /// Sends `DELETE /instance/delete/{instance}`.
    pub async fn delete_instance(&self, instance: &str) -> Result<(), EvolutionError> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/instance/delete/{instance}")))
            .header("apikey", &self.api_key)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Send a plain text message to `number` (digits, with country code).
    ///
    /// Sends `POST /message/sendText/{instance}`.
    pub async fn send_text(&self, instance: &str, number: &str, text: &str) -> Result<(), EvolutionError> {
        let body = json!({
            "number": number,
            "text": text,
        });
        let response = self
            .client
            .post(self.endpoint(&format!("/message/sendText/{instance}")))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await?;

        Self::check_status(response).await
    }

    // ---- private helpers ----

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`EvolutionError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, EvolutionError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(EvolutionError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, EvolutionError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), EvolutionError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
