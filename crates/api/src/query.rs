//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?workspace_id=` filter for project listings.
#[derive(Debug, Default, Deserialize)]
pub struct WorkspaceParams {
    pub workspace_id: Option<String>,
}
