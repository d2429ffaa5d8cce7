//! WhatsApp confirmation messages: body selection, composition, and the
//! per-broadcast outcome tally.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which guests a broadcast targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetAudience {
    /// Every guest with a phone number.
    #[default]
    All,
    /// Only guests whose RSVP is still `PENDENTE`.
    Pending,
}

/// Introduction / conclusion pair wrapped around the invitee list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub introduction: String,
    pub conclusion: String,
}

/// The text sent to each guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Sent verbatim to every guest.
    Simple(String),
    /// Personalised with the guest's and companions' names.
    Template(MessageTemplate),
}

impl MessageBody {
    /// Pick the body for a broadcast.
    ///
    /// Precedence: a non-blank simple message, then an explicit template,
    /// then the project's stored template. With none of them there is
    /// nothing to send.
    pub fn resolve(
        simple_message: Option<String>,
        template: Option<MessageTemplate>,
        stored: Option<MessageTemplate>,
    ) -> Result<Self, CoreError> {
        if let Some(text) = simple_message.filter(|t| !t.trim().is_empty()) {
            return Ok(MessageBody::Simple(text));
        }
        if let Some(template) = template.or(stored) {
            if template.introduction.trim().is_empty() && template.conclusion.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Message template is empty".into(),
                ));
            }
            return Ok(MessageBody::Template(template));
        }
        Err(CoreError::Validation(
            "Provide a simple_message or a template, or save a WhatsApp configuration first".into(),
        ))
    }

    /// Render the message for one guest and their companions.
    pub fn render<'a>(
        &self,
        guest_name: &'a str,
        companion_names: impl IntoIterator<Item = &'a str>,
    ) -> String {
        match self {
            MessageBody::Simple(text) => text.clone(),
            MessageBody::Template(template) => compose_confirmation(
                &template.introduction,
                std::iter::once(guest_name).chain(companion_names),
                &template.conclusion,
            ),
        }
    }
}

/// `"{intro}\n\n{name}\n{name}...\n\n{conclusion}"`.
pub fn compose_confirmation<'a>(
    introduction: &str,
    names: impl IntoIterator<Item = &'a str>,
    conclusion: &str,
) -> String {
    let list: Vec<&str> = names.into_iter().collect();
    format!("{introduction}\n\n{}\n\n{conclusion}", list.join("\n"))
}

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

/// Result of attempting to message a single guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Successful,
    Failed,
    Skipped,
}

/// Aggregate outcome of a broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendSummary {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    pub skipped: u32,
}

impl SendSummary {
    /// Start a tally for `total` selected guests.
    pub fn new(total: u32) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: SendOutcome) {
        match outcome {
            SendOutcome::Successful => self.successful += 1,
            SendOutcome::Failed => self.failed += 1,
            SendOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Number of guests with a recorded outcome.
    pub fn processed(&self) -> u32 {
        self.successful + self.failed + self.skipped
    }

    /// True once every selected guest has an outcome.
    pub fn is_complete(&self) -> bool {
        self.processed() == self.total
    }
}
