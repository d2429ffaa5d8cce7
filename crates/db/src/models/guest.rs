//! Guest and companion models and DTOs.

use serde::{Deserialize, Serialize};
use sprezzia_core::guest_csv::{CsvCompanion, CsvRowError, GuestCsvRecord};
use sprezzia_core::status::{GuestStatus, MessageStatus};
use sprezzia_core::types::{DbId, Timestamp};
use sprezzia_core::validation::MAX_OBSERVATIONS_LENGTH;
use sqlx::FromRow;
use validator::Validate;

/// `validator` length bounds are `u64`; same value as the shared limit.
const MAX_OBSERVATIONS_LENGTH_U64: u64 = MAX_OBSERVATIONS_LENGTH as u64;

/// A guest row from the `guests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Guest {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub phone: Option<String>,
    pub status: GuestStatus,
    pub message_status: MessageStatus,
    pub children_0_6: i32,
    pub children_7_10: i32,
    pub observations: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A companion row from the `companions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Companion {
    pub id: DbId,
    pub guest_id: DbId,
    pub name: String,
    pub status: GuestStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A guest together with its companions, as returned by the guest endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct GuestWithCompanions {
    #[serde(flatten)]
    pub guest: Guest,
    pub companions: Vec<Companion>,
}

/// A companion in a create or full-update payload.
///
/// `id` identifies an existing companion of the same guest; without it a
/// new companion is inserted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompanionInput {
    pub id: Option<DbId>,
    #[validate(length(min = 1, max = 200, message = "companion name must be 1..=200 characters"))]
    pub name: String,
    /// Defaults to `PENDENTE` if omitted.
    pub status: Option<GuestStatus>,
}

/// DTO for creating a guest (and its companions).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGuest {
    #[validate(length(min = 1, max = 200, message = "name must be 1..=200 characters"))]
    pub name: String,
    pub phone: Option<String>,
    pub status: Option<GuestStatus>,
    #[serde(default)]
    #[validate(range(min = 0, message = "children_0_6 must not be negative"))]
    pub children_0_6: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "children_7_10 must not be negative"))]
    pub children_7_10: i32,
    #[validate(length(
        max = MAX_OBSERVATIONS_LENGTH_U64,
        message = "observations must be at most 2000 characters"
    ))]
    pub observations: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub companions: Vec<CompanionInput>,
}

/// DTO for the full guest update. The submitted companion list replaces
/// the stored one.
pub type ReplaceGuest = CreateGuest;

/// DTO for the contact-only update. Only non-`None` fields are applied;
/// a blank `phone` clears the stored one.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGuestContact {
    #[validate(length(min = 1, max = 200, message = "name must be 1..=200 characters"))]
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Guest fields exposed by the unauthenticated guest list.
#[derive(Debug, Clone, Serialize)]
pub struct PublicGuest {
    pub id: DbId,
    pub name: String,
    pub status: GuestStatus,
    pub companions: Vec<PublicCompanion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicCompanion {
    pub id: DbId,
    pub name: String,
    pub status: GuestStatus,
}

impl From<GuestWithCompanions> for PublicGuest {
    fn from(value: GuestWithCompanions) -> Self {
        Self {
            id: value.guest.id,
            name: value.guest.name,
            status: value.guest.status,
            companions: value
                .companions
                .into_iter()
                .map(|c| PublicCompanion {
                    id: c.id,
                    name: c.name,
                    status: c.status,
                })
                .collect(),
        }
    }
}

/// Result of a CSV import.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    /// Data rows found in the file (header excluded).
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<CsvRowError>,
}

impl From<&GuestCsvRecord> for CreateGuest {
    fn from(record: &GuestCsvRecord) -> Self {
        Self {
            name: record.name.clone(),
            phone: record.phone.clone(),
            status: Some(record.status),
            children_0_6: record.children_0_6,
            children_7_10: record.children_7_10,
            observations: None,
            companions: record
                .companions
                .iter()
                .map(|c| CompanionInput {
                    id: None,
                    name: c.name.clone(),
                    status: Some(c.status),
                })
                .collect(),
        }
    }
}

impl From<&GuestWithCompanions> for GuestCsvRecord {
    fn from(value: &GuestWithCompanions) -> Self {
        Self {
            name: value.guest.name.clone(),
            phone: value.guest.phone.clone(),
            status: value.guest.status,
            companions: value
                .companions
                .iter()
                .map(|c| CsvCompanion {
                    name: c.name.clone(),
                    status: c.status,
                })
                .collect(),
            children_0_6: value.guest.children_0_6,
            children_7_10: value.guest.children_7_10,
        }
    }
}
