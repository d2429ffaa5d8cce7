use std::sync::Arc;

use sprezzia_evolution::MessageGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: sprezzia_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WhatsApp gateway used for instance management and broadcasts.
    pub gateway: Arc<dyn MessageGateway>,
}

impl AppState {
    /// Gateway instance name for a project.
    pub fn instance_name(&self, project_id: sprezzia_core::types::DbId) -> String {
        sprezzia_evolution::instance_name(&self.config.evolution.instance_prefix, project_id)
    }
}
