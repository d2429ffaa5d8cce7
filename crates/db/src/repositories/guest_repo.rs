//! Repository for the `guests` table and the companions owned by each guest.

use std::collections::{HashMap, HashSet};

use sprezzia_core::guest_csv::{CsvParseReport, CsvRowError};
use sprezzia_core::stats::GuestStats;
use sprezzia_core::status::{GuestStatus, MessageStatus};
use sprezzia_core::types::DbId;
use sqlx::PgPool;

use crate::models::guest::{
    Companion, CompanionInput, CreateGuest, Guest, GuestWithCompanions, ImportReport,
    ReplaceGuest, UpdateGuestContact,
};
use crate::repositories::companion_repo::{self, CompanionOrder, CompanionRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, phone, status, message_status, \
                       children_0_6, children_7_10, observations, created_at, updated_at";

/// Order in which a project's guests (and their companions) are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestOrder {
    /// Most recently added guest first; companions in insertion order.
    Newest,
    /// Alphabetical guests and companions.
    Name,
}

impl GuestOrder {
    fn clause(self) -> &'static str {
        match self {
            GuestOrder::Newest => "created_at DESC, id DESC",
            GuestOrder::Name => "name, id",
        }
    }

    fn companion_order(self) -> CompanionOrder {
        match self {
            GuestOrder::Newest => CompanionOrder::Created,
            GuestOrder::Name => CompanionOrder::Name,
        }
    }
}

type Tx<'a> = sqlx::Transaction<'a, sqlx::Postgres>;

/// Provides CRUD, RSVP and import operations for guests.
pub struct GuestRepo;

impl GuestRepo {
    /// Insert a guest and its companions in one transaction.
    pub async fn create_with_companions(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateGuest,
    ) -> Result<GuestWithCompanions, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO guests
                (project_id, name, phone, status, children_0_6, children_7_10, observations)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let guest = sqlx::query_as::<_, Guest>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(input.status.unwrap_or_default())
            .bind(input.children_0_6)
            .bind(input.children_7_10)
            .bind(&input.observations)
            .fetch_one(&mut *tx)
            .await?;

        let companions = Self::sync_companions_inner(&mut tx, guest.id, &input.companions).await?;

        tx.commit().await?;
        Ok(GuestWithCompanions { guest, companions })
    }

    /// Find a guest by ID within a project.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        guest_id: DbId,
    ) -> Result<Option<Guest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guests WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Guest>(&query)
            .bind(guest_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a guest with its companions (insertion order).
    pub async fn find_with_companions(
        pool: &PgPool,
        project_id: DbId,
        guest_id: DbId,
    ) -> Result<Option<GuestWithCompanions>, sqlx::Error> {
        let Some(guest) = Self::find_by_id(pool, project_id, guest_id).await? else {
            return Ok(None);
        };
        let companions = CompanionRepo::list_by_guest(pool, guest.id).await?;
        Ok(Some(GuestWithCompanions { guest, companions }))
    }

    /// List a project's guests with their companions.
    pub async fn list_with_companions(
        pool: &PgPool,
        project_id: DbId,
        order: GuestOrder,
    ) -> Result<Vec<GuestWithCompanions>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM guests WHERE project_id = $1 ORDER BY {}",
            order.clause()
        );
        let guests = sqlx::query_as::<_, Guest>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await?;
        Self::attach_companions(pool, guests, order.companion_order()).await
    }

    /// Guests the broadcast should message: those with a phone on file,
    /// optionally only the ones still `PENDENTE`. Oldest first.
    pub async fn list_for_broadcast(
        pool: &PgPool,
        project_id: DbId,
        only_status: Option<GuestStatus>,
    ) -> Result<Vec<GuestWithCompanions>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM guests
             WHERE project_id = $1 AND phone IS NOT NULL
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at, id"
        );
        let guests = sqlx::query_as::<_, Guest>(&query)
            .bind(project_id)
            .bind(only_status)
            .fetch_all(pool)
            .await?;
        Self::attach_companions(pool, guests, CompanionOrder::Created).await
    }

    /// Update name and/or phone. Only non-`None` fields are applied, and an
    /// empty phone is stored as NULL.
    pub async fn update_contact(
        pool: &PgPool,
        project_id: DbId,
        guest_id: DbId,
        input: &UpdateGuestContact,
    ) -> Result<Option<Guest>, sqlx::Error> {
        let query = format!(
            "UPDATE guests SET
                name = COALESCE($3, name),
                phone = CASE WHEN $4::TEXT IS NULL THEN phone ELSE NULLIF($4, '') END
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Guest>(&query)
            .bind(guest_id)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.phone)
            .fetch_optional(pool)
            .await
    }

    /// Full update of a guest. The stored companions are made to match
    /// `input.companions` exactly, keeping the ids of resubmitted ones.
    ///
    /// Returns `None` if the guest does not exist in the project.
    pub async fn replace(
        pool: &PgPool,
        project_id: DbId,
        guest_id: DbId,
        input: &ReplaceGuest,
    ) -> Result<Option<GuestWithCompanions>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE guests SET
                name = $3,
                phone = $4,
                status = COALESCE($5, status),
                children_0_6 = $6,
                children_7_10 = $7,
                observations = $8
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        let Some(guest) = sqlx::query_as::<_, Guest>(&query)
            .bind(guest_id)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(input.status)
            .bind(input.children_0_6)
            .bind(input.children_7_10)
            .bind(&input.observations)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let companions = Self::sync_companions_inner(&mut tx, guest.id, &input.companions).await?;

        tx.commit().await?;
        Ok(Some(GuestWithCompanions { guest, companions }))
    }

    /// Set the guest's own RSVP status (companions untouched).
    pub async fn set_status(
        pool: &PgPool,
        project_id: DbId,
        guest_id: DbId,
        status: GuestStatus,
    ) -> Result<Option<Guest>, sqlx::Error> {
        let query = format!(
            "UPDATE guests SET status = $3
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Guest>(&query)
            .bind(guest_id)
            .bind(project_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Set the guest and every one of its companions to `status` in a
    /// single transaction.
    pub async fn apply_bulk_status(
        pool: &PgPool,
        project_id: DbId,
        guest_id: DbId,
        status: GuestStatus,
    ) -> Result<Option<GuestWithCompanions>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE guests SET status = $3
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        let Some(guest) = sqlx::query_as::<_, Guest>(&query)
            .bind(guest_id)
            .bind(project_id)
            .bind(status)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE companions SET status = $2 WHERE guest_id = $1 RETURNING {}",
            companion_repo::COLUMNS
        );
        let mut companions = sqlx::query_as::<_, Companion>(&query)
            .bind(guest.id)
            .bind(status)
            .fetch_all(&mut *tx)
            .await?;
        companions.sort_by_key(|c| c.id);

        tx.commit().await?;
        Ok(Some(GuestWithCompanions { guest, companions }))
    }

    /// Record the outcome of the latest WhatsApp send to this guest.
    pub async fn set_message_status(
        pool: &PgPool,
        guest_id: DbId,
        message_status: MessageStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE guests SET message_status = $2 WHERE id = $1")
            .bind(guest_id)
            .bind(message_status)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a guest; its companions go with it. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, project_id: DbId, guest_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM guests WHERE id = $1 AND project_id = $2")
            .bind(guest_id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Aggregate RSVP, children and message counters for a project.
    pub async fn stats(pool: &PgPool, project_id: DbId) -> Result<GuestStats, sqlx::Error> {
        let guests: Vec<(GuestStatus, MessageStatus, i32, i32)> = sqlx::query_as(
            "SELECT status, message_status, children_0_6, children_7_10
             FROM guests WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        let companions: Vec<GuestStatus> = sqlx::query_scalar(
            "SELECT c.status FROM companions c
             JOIN guests g ON g.id = c.guest_id
             WHERE g.project_id = $1",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        let mut stats = GuestStats::default();
        for (status, message_status, children_0_6, children_7_10) in guests {
            stats.add_guest(status, message_status, children_0_6, children_7_10);
        }
        for status in companions {
            stats.add_companion(status);
        }
        Ok(stats)
    }

    /// Insert every parsed CSV row, each in its own transaction.
    ///
    /// A row that fails to save is reported with its line number; the
    /// remaining rows are still imported. Parse errors already in `parsed`
    /// are carried into the report.
    pub async fn import_rows(pool: &PgPool, project_id: DbId, parsed: CsvParseReport) -> ImportReport {
        let mut report = ImportReport {
            total_rows: parsed.rows.len() + parsed.errors.len(),
            errors: parsed.errors,
            ..ImportReport::default()
        };

        for row in parsed.rows {
            let input = CreateGuest::from(&row.record);
            match Self::create_with_companions(pool, project_id, &input).await {
                Ok(_) => report.imported += 1,
                Err(e) => {
                    tracing::warn!(
                        project_id,
                        line = row.line,
                        error = %e,
                        "Guest import row failed",
                    );
                    report.errors.push(CsvRowError {
                        line: row.line,
                        reason: "row could not be saved".to_string(),
                    });
                }
            }
        }

        report.errors.sort_by_key(|e| e.line);
        report.skipped = report.errors.len();
        report
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Load companions for `guests` in one query and pair them up.
    async fn attach_companions(
        pool: &PgPool,
        guests: Vec<Guest>,
        order: CompanionOrder,
    ) -> Result<Vec<GuestWithCompanions>, sqlx::Error> {
        let ids: Vec<DbId> = guests.iter().map(|g| g.id).collect();
        let mut by_guest: HashMap<DbId, Vec<Companion>> = HashMap::new();
        for companion in CompanionRepo::list_by_guests(pool, &ids, order).await? {
            by_guest.entry(companion.guest_id).or_default().push(companion);
        }
        Ok(guests
            .into_iter()
            .map(|guest| {
                let companions = by_guest.remove(&guest.id).unwrap_or_default();
                GuestWithCompanions { guest, companions }
            })
            .collect())
    }

    /// Make the guest's companions match `submitted` within an existing
    /// transaction.
    ///
    /// Submitted entries whose `id` belongs to the guest are updated in
    /// place (first occurrence only); all other entries are inserted;
    /// stored companions that were not resubmitted are deleted. Returns the
    /// companions in submission order.
    async fn sync_companions_inner(
        tx: &mut Tx<'_>,
        guest_id: DbId,
        submitted: &[CompanionInput],
    ) -> Result<Vec<Companion>, sqlx::Error> {
        let existing: HashSet<DbId> =
            sqlx::query_scalar::<_, DbId>("SELECT id FROM companions WHERE guest_id = $1")
                .bind(guest_id)
                .fetch_all(&mut **tx)
                .await?
                .into_iter()
                .collect();

        let mut kept: HashSet<DbId> = HashSet::new();
        let plan: Vec<Option<DbId>> = submitted
            .iter()
            .map(|c| c.id.filter(|id| existing.contains(id) && kept.insert(*id)))
            .collect();

        let kept_ids: Vec<DbId> = kept.iter().copied().collect();
        sqlx::query("DELETE FROM companions WHERE guest_id = $1 AND NOT (id = ANY($2))")
            .bind(guest_id)
            .bind(&kept_ids)
            .execute(&mut **tx)
            .await?;

        let update = format!(
            "UPDATE companions SET name = $2, status = COALESCE($3, status)
             WHERE id = $1
             RETURNING {}",
            companion_repo::COLUMNS
        );
        let insert = format!(
            "INSERT INTO companions (guest_id, name, status)
             VALUES ($1, $2, $3)
             RETURNING {}",
            companion_repo::COLUMNS
        );

        let mut companions = Vec::with_capacity(submitted.len());
        for (input, existing_id) in submitted.iter().zip(plan) {
            let companion = match existing_id {
                Some(id) => {
                    sqlx::query_as::<_, Companion>(&update)
                        .bind(id)
                        .bind(&input.name)
                        .bind(input.status)
                        .fetch_one(&mut **tx)
                        .await?
                }
                None => {
                    sqlx::query_as::<_, Companion>(&insert)
                        .bind(guest_id)
                        .bind(&input.name)
                        .bind(input.status.unwrap_or_default())
                        .fetch_one(&mut **tx)
                        .await?
                }
            };
            companions.push(companion);
        }
        Ok(companions)
    }
}
