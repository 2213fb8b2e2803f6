//! Asynchronous id-uniqueness check with stale-result protection.
//!
//! A check is issued as a ticket carrying a monotonically increasing token.
//! Only the result for the latest ticket may be applied; anything older is
//! discarded, as is any result issued before the value was edited again.

use crate::gateway::ProductsGateway;
use log::warn;

/// Outcome of the uniqueness rule for the current id value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdAvailability {
    /// No check has completed for the current value.
    #[default]
    Unchecked,
    /// A check is in flight.
    Pending,
    Available,
    Taken,
}

/// In-flight check handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCheckTicket {
    token: u64,
    id: String,
}

impl IdCheckTicket {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

/// Token source deciding which check result is current.
#[derive(Debug, Default)]
pub struct IdCheckGuard {
    latest: u64,
}

impl IdCheckGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one.
    pub fn issue(&mut self, id: impl Into<String>) -> IdCheckTicket {
        self.latest += 1;
        IdCheckTicket {
            token: self.latest,
            id: id.into(),
        }
    }

    /// Makes every outstanding ticket stale.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, ticket: &IdCheckTicket) -> bool {
        ticket.token == self.latest
    }
}

/// Asks the gateway whether `id` is taken.
///
/// A failed verification call counts as "not taken": the backend still
/// enforces uniqueness on create.
pub async fn is_id_taken<G: ProductsGateway + ?Sized>(gateway: &G, id: &str) -> bool {
    match gateway.verify_id_exists(id).await {
        Ok(taken) => taken,
        Err(err) => {
            warn!(
                "event=id_check module=form status=error id={} error={}",
                id, err
            );
            false
        }
    }
}
