//! Guest list aggregates shown on the project dashboard.

use serde::Serialize;

use crate::status::{GuestStatus, MessageStatus};

/// Per-project guest list totals.
///
/// RSVP counts (`confirmed`, `declined`, `pending`) are people-level: a
/// guest and each of their companions count once. Message counts are
/// guest-level because messages go to the guest's phone only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GuestStats {
    pub guests: i64,
    pub companions: i64,
    pub total_people: i64,
    pub confirmed: i64,
    pub declined: i64,
    pub pending: i64,
    pub children_0_6: i64,
    pub children_7_10: i64,
    pub messages_sent: i64,
    pub messages_failed: i64,
    pub messages_not_sent: i64,
}

impl GuestStats {
    pub fn add_guest(
        &mut self,
        status: GuestStatus,
        message_status: MessageStatus,
        children_0_6: i32,
        children_7_10: i32,
    ) {
        self.guests += 1;
        self.total_people += 1;
        self.count_rsvp(status);
        self.children_0_6 += i64::from(children_0_6);
        self.children_7_10 += i64::from(children_7_10);
        match message_status {
            MessageStatus::Enviada => self.messages_sent += 1,
            MessageStatus::Erro => self.messages_failed += 1,
            MessageStatus::NaoEnviada => self.messages_not_sent += 1,
        }
    }

    pub fn add_companion(&mut self, status: GuestStatus) {
        self.companions += 1;
        self.total_people += 1;
        self.count_rsvp(status);
    }

    fn count_rsvp(&mut self, status: GuestStatus) {
        match status {
            GuestStatus::ConfirmadoPresenca => self.confirmed += 1,
            GuestStatus::ConfirmadoAusencia => self.declined += 1,
            GuestStatus::Pendente => self.pending += 1,
        }
    }
}
