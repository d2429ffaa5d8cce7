//! Project entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sprezzia_core::status::ProjectStatus;
use sprezzia_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// Workspace assigned to projects created without one.
pub const DEFAULT_WORKSPACE_ID: &str = "default";

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub owner_id: String,
    pub workspace_id: String,
    pub name: String,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_type: Option<String>,
    pub budget: Option<f64>,
    /// `data:<type>;base64,<payload>` cover image.
    pub image: Option<String>,
    pub status: ProjectStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project. The owner comes from the caller's token.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub budget: Option<f64>,
    /// Defaults to [`DEFAULT_WORKSPACE_ID`] if omitted.
    pub workspace_id: Option<String>,
    /// Defaults to `ACTIVE` if omitted.
    pub status: Option<ProjectStatus>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub budget: Option<f64>,
    pub status: Option<ProjectStatus>,
}

/// Owner-level project counters.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProjectStats {
    pub total_projects: i64,
    pub active_projects: i64,
}

/// Fields exposed by the unauthenticated project endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicProject {
    pub id: DbId,
    pub name: String,
    pub event_date: Option<NaiveDate>,
}
