//! Helpers shared by the page modules.

#[cfg(test)]
#[path = "common_test.rs"]
mod common_test;

use leptos::prelude::*;

use crate::net::api::ApiError;
use crate::state::notices::NoticeState;
use crate::util::request_seq::{Generation, Ticket};

/// Toast text for a failed call, or `None` when the session store has
/// already told the user (credential rejected).
pub fn error_description(error: &ApiError, fallback: &str) -> Option<String> {
    match error {
        ApiError::SessionInvalidated { .. } => None,
        _ => Some(error.server_message().unwrap_or(fallback).to_owned()),
    }
}

/// Log a failed call and queue an error toast for it.
pub fn report_failure(notices: RwSignal<NoticeState>, context: &str, error: &ApiError, fallback: &str) {
    leptos::logging::warn!("{context}: {error}");
    if let Some(description) = error_description(error, fallback) {
        notices.update(|state| {
            state.error("Error", &description);
        });
    }
}

/// Parse a `<select>` value into an id; the empty placeholder yields `None`.
pub fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Trimester choices offered by the grade and report screens.
pub const TRIMESTERS: [(u8, &str); 3] = [(1, "Primer Trimestre"), (2, "Segundo Trimestre"), (3, "Tercer Trimestre")];

/// Start a new request generation and return its ticket.
pub fn take_ticket(seq: StoredValue<Generation>) -> Ticket {
    let mut ticket = Ticket::default();
    seq.update_value(|generation| ticket = generation.issue());
    ticket
}

/// Whether a response holding `ticket` may still be applied.
pub fn is_latest(seq: StoredValue<Generation>, ticket: Ticket) -> bool {
    seq.with_value(|generation| generation.is_current(ticket))
}

/// Drop every in-flight response of `seq`.
pub fn stale_all(seq: StoredValue<Generation>) {
    seq.update_value(Generation::invalidate);
}
