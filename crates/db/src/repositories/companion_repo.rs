//! Repository for the `companions` table.

use sprezzia_core::status::GuestStatus;
use sprezzia_core::types::DbId;
use sqlx::PgPool;

use crate::models::guest::Companion;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, guest_id, name, status, created_at, updated_at";

/// Same columns qualified with the `c` alias, for joins.
const QUALIFIED_COLUMNS: &str =
    "c.id, c.guest_id, c.name, c.status, c.created_at, c.updated_at";

/// Order in which companions of a guest are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionOrder {
    /// Insertion order; matches the order the companions were submitted in.
    Created,
    /// Alphabetical, for the public guest list.
    Name,
}

impl CompanionOrder {
    fn clause(self) -> &'static str {
        match self {
            CompanionOrder::Created => "guest_id, id",
            CompanionOrder::Name => "guest_id, name, id",
        }
    }
}

/// Provides read and status operations for companions. Companions are
/// created and removed through [`GuestRepo`](super::GuestRepo).
pub struct CompanionRepo;

impl CompanionRepo {
    /// List the companions of one guest in insertion order.
    pub async fn list_by_guest(pool: &PgPool, guest_id: DbId) -> Result<Vec<Companion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companions WHERE guest_id = $1 ORDER BY id");
        sqlx::query_as::<_, Companion>(&query)
            .bind(guest_id)
            .fetch_all(pool)
            .await
    }

    /// List the companions of many guests at once, grouped by guest.
    pub async fn list_by_guests(
        pool: &PgPool,
        guest_ids: &[DbId],
        order: CompanionOrder,
    ) -> Result<Vec<Companion>, sqlx::Error> {
        if guest_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM companions WHERE guest_id = ANY($1) ORDER BY {}",
            order.clause()
        );
        sqlx::query_as::<_, Companion>(&query)
            .bind(guest_ids)
            .fetch_all(pool)
            .await
    }

    /// Set one companion's RSVP status. Returns `None` when the companion is
    /// not under the given guest and project.
    pub async fn set_status(
        pool: &PgPool,
        project_id: DbId,
        guest_id: DbId,
        companion_id: DbId,
        status: GuestStatus,
    ) -> Result<Option<Companion>, sqlx::Error> {
        let query = format!(
            "UPDATE companions c SET status = $4
             FROM guests g
             WHERE c.id = $1 AND c.guest_id = $2 AND g.id = c.guest_id AND g.project_id = $3
             RETURNING {QUALIFIED_COLUMNS}"
        );
        sqlx::query_as::<_, Companion>(&query)
            .bind(companion_id)
            .bind(guest_id)
            .bind(project_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
