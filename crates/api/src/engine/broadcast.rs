//! Sequential WhatsApp broadcast to a project's guest list.
//!
//! Guests are messaged one at a time with a pause between sends so the
//! gateway is not flooded. A failed send is tallied and the loop moves on;
//! there is no retry and nothing is rolled back.

use std::time::Duration;

use sprezzia_core::messaging::{MessageBody, SendOutcome, SendSummary};
use sprezzia_core::phone::normalize_phone;
use sprezzia_core::status::MessageStatus;
use sprezzia_db::models::guest::GuestWithCompanions;
use sprezzia_db::repositories::GuestRepo;
use sprezzia_db::DbPool;
use sprezzia_evolution::MessageGateway;

/// Everything a broadcast needs besides the guests.
pub struct Broadcast<'a> {
    pub pool: &'a DbPool,
    pub gateway: &'a dyn MessageGateway,
    /// Gateway instance the messages go out through.
    pub instance: &'a str,
    pub body: &'a MessageBody,
    /// Pause between two consecutive sends.
    pub delay: Duration,
}

impl Broadcast<'_> {
    /// Message every guest in order and return the tally.
    ///
    /// Guests whose phone has no digits are skipped and keep their message
    /// status. Successful sends set `ENVIADA`, failures `ERRO`.
    pub async fn run(&self, guests: Vec<GuestWithCompanions>) -> SendSummary {
        let mut summary = SendSummary::new(guests.len() as u32);
        let mut sent_before = false;

        for entry in &guests {
            let outcome = match entry.guest.phone.as_deref().and_then(normalize_phone) {
                None => {
                    tracing::debug!(guest_id = entry.guest.id, "Skipping guest without a usable phone");
                    SendOutcome::Skipped
                }
                Some(number) => {
                    if sent_before && !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    sent_before = true;
                    self.send_one(entry, &number).await
                }
            };
            summary.record(outcome);
        }
        debug_assert!(summary.is_complete(), "every selected guest gets an outcome");

        tracing::info!(
            instance = self.instance,
            total = summary.total,
            successful = summary.successful,
            failed = summary.failed,
            skipped = summary.skipped,
            "WhatsApp broadcast finished",
        );
        summary
    }

    async fn send_one(&self, entry: &GuestWithCompanions, number: &str) -> SendOutcome {
        let guest_id = entry.guest.id;
        let text = self.body.render(
            &entry.guest.name,
            entry.companions.iter().map(|c| c.name.as_str()),
        );

        let (outcome, status) = match self.gateway.send_text(self.instance, number, &text).await {
            Ok(()) => (SendOutcome::Successful, MessageStatus::Enviada),
            Err(e) => {
                tracing::warn!(guest_id, error = %e, "WhatsApp send failed");
                (SendOutcome::Failed, MessageStatus::Erro)
            }
        };

        if let Err(e) = GuestRepo::set_message_status(self.pool, guest_id, status).await {
            tracing::error!(guest_id, error = %e, "Failed to record message status");
        }
        outcome
    }
}
