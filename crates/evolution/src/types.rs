//! Gateway payloads the rest of the backend cares about.

use serde::Serialize;
use serde_json::Value;

/// Connection state of a WhatsApp instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Open,
    Connecting,
    Close,
    Unknown,
}

impl ConnectionState {
    /// Map the gateway's state string. Anything unrecognised is `Unknown`.
    pub fn from_gateway(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "open" => ConnectionState::Open,
            "connecting" => ConnectionState::Connecting,
            "close" | "closed" => ConnectionState::Close,
            _ => ConnectionState::Unknown,
        }
    }

    /// Read the state out of a `connectionState` response, which nests it
    /// under `instance` on current gateway versions.
    pub fn from_response(body: &Value) -> Self {
        body.pointer("/instance/state")
            .or_else(|| body.get("state"))
            .and_then(Value::as_str)
            .map(Self::from_gateway)
            .unwrap_or(ConnectionState::Unknown)
    }
}

/// QR code (and pairing code) used to link a phone to an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QrCode {
    /// `data:image/png;base64,...` rendering of the code.
    pub base64: Option<String>,
    /// Raw QR payload.
    pub code: Option<String>,
    pub pairing_code: Option<String>,
}

impl QrCode {
    /// Extract the QR code from a `connect` or `create` response. The
    /// create response nests it under `qrcode`.
    pub fn from_response(body: &Value) -> Self {
        let source = body.get("qrcode").filter(|v| v.is_object()).unwrap_or(body);
        let text = |key: &str| source.get(key).and_then(Value::as_str).map(String::from);
        Self {
            base64: text("base64"),
            code: text("code"),
            pairing_code: text("pairingCode"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base64.is_none() && self.code.is_none() && self.pairing_code.is_none()
    }
}
