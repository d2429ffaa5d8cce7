//! Client for the Evolution API WhatsApp gateway.
//!
//! [`EvolutionClient`] wraps the gateway's REST endpoints (instance
//! lifecycle, connection state, text messages) using [`reqwest`].
//! Callers depend on the [`MessageGateway`] trait so the HTTP contract
//! stays inside this crate.

pub mod client;
pub mod error;
pub mod gateway;
pub mod types;

pub use client::EvolutionClient;
pub use error::EvolutionError;
pub use gateway::{instance_name, MessageGateway};
pub use types::{ConnectionState, QrCode};
