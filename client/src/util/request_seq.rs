//! Generation tickets for discarding stale responses.
//!
//! A view that refetches whenever a selector changes takes a ticket before
//! each request and applies the response only if no newer ticket was issued
//! in the meantime. In-flight requests are never cancelled; late answers are
//! simply dropped.

#[cfg(test)]
#[path = "request_seq_test.rs"]
mod request_seq_test;

/// Proof of which request generation a response belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Copy, Debug, Default)]
pub struct Generation {
    latest: u64,
}

impl Generation {
    /// Start a new generation; every earlier ticket becomes stale.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Mark every outstanding ticket stale without starting a request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}
