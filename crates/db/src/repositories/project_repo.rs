//! Repository for the `projects` table.

use sprezzia_core::status::ProjectStatus;
use sprezzia_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{
    CreateProject, Project, ProjectStats, PublicProject, UpdateProject, DEFAULT_WORKSPACE_ID,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, workspace_id, name, description, event_date, event_type, \
                       budget, image, status, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `owner_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: &str,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (owner_id, workspace_id, name, description, event_date, event_type, budget, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(input.workspace_id.as_deref().unwrap_or(DEFAULT_WORKSPACE_ID))
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.event_date)
            .bind(&input.event_type)
            .bind(input.budget)
            .bind(input.status.unwrap_or_default())
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID, regardless of owner.
    ///
    /// Ownership is checked by the caller so that a foreign project can be
    /// told apart from a missing one.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's projects, most recently created first, optionally
    /// restricted to one workspace.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: &str,
        workspace_id: Option<&str>,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE owner_id = $1 AND ($2::TEXT IS NULL OR workspace_id = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(workspace_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                event_type = COALESCE($5, event_type),
                budget = COALESCE($6, budget),
                status = COALESCE($7, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.event_date)
            .bind(&input.event_type)
            .bind(input.budget)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Replace the cover image (a `data:` URL).
    pub async fn set_image(
        pool: &PgPool,
        id: DbId,
        image: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("UPDATE projects SET image = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(image)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project and, by cascade, everything under it.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total and active project counts for one owner.
    pub async fn stats_by_owner(pool: &PgPool, owner_id: &str) -> Result<ProjectStats, sqlx::Error> {
        let (total_projects, active_projects): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = $2)
             FROM projects WHERE owner_id = $1",
        )
        .bind(owner_id)
        .bind(ProjectStatus::Active)
        .fetch_one(pool)
        .await?;
        Ok(ProjectStats {
            total_projects,
            active_projects,
        })
    }

    /// The public subset of a project, for unauthenticated pages.
    pub async fn find_public(pool: &PgPool, id: DbId) -> Result<Option<PublicProject>, sqlx::Error> {
        sqlx::query_as::<_, PublicProject>("SELECT id, name, event_date FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
