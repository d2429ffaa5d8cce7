//! Domain rules for Sprezzia that need no database, network, or async runtime.
//!
//! - [`error`] -- the shared [`error::CoreError`] type.
//! - [`types`] -- id and timestamp aliases.
//! - [`status`] -- RSVP, message, and project status enums.
//! - [`validation`] -- name, size, and content-type limits.
//! - [`phone`] -- phone number normalisation for the WhatsApp gateway.
//! - [`messaging`] -- confirmation message composition and send tallies.
//! - [`guest_csv`] -- the canonical guest CSV import/export format.
//! - [`stats`] -- guest list aggregates.

pub mod error;
pub mod guest_csv;
pub mod messaging;
pub mod phone;
pub mod stats;
pub mod status;
pub mod types;
pub mod validation;
