//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod companion_repo;
pub mod document_repo;
pub mod guest_list_settings_repo;
pub mod guest_repo;
pub mod project_repo;
pub mod whatsapp_config_repo;

pub use companion_repo::CompanionRepo;
pub use document_repo::DocumentRepo;
pub use guest_list_settings_repo::GuestListSettingsRepo;
pub use guest_repo::GuestRepo;
pub use project_repo::ProjectRepo;
pub use whatsapp_config_repo::WhatsAppConfigRepo;
