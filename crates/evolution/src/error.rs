/// Errors from the Evolution API layer.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Evolution API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl EvolutionError {
    /// Whether the gateway rejected instance creation because the name is
    /// already taken.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, EvolutionError::Api { status: 403 | 409, .. })
    }
}
