//! Request sequencing
//!
//! Search-as-you-type issues overlapping queries whose responses can resolve
//! out of order. Each query takes a ticket; only the response holding the
//! latest ticket is applied.

use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket for one issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

impl QueryTicket {
    /// Ticket from a client supplied sequence number.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Sequence number.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets.
#[derive(Debug, Default)]
pub struct QuerySequencer {
    latest: AtomicU64,
}

impl QuerySequencer {
    /// Create a sequencer that has issued nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket. The first ticket is 1.
    pub fn issue(&self) -> QueryTicket {
        QueryTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` is the most recently issued one.
    pub fn is_latest(&self, ticket: QueryTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}

/// Holds the response of the latest query.
#[derive(Debug)]
pub struct Latest<T> {
    applied: Option<(QueryTicket, T)>,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self { applied: None }
    }
}

impl<T> Latest<T> {
    /// Create an empty holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `value` if `ticket` is the latest issued by `sequencer`.
    ///
    /// Returns whether the value was applied.
    pub fn offer(&mut self, sequencer: &QuerySequencer, ticket: QueryTicket, value: T) -> bool {
        if !sequencer.is_latest(ticket) {
            return false;
        }

        if self
            .applied
            .as_ref()
            .is_some_and(|(applied, _)| *applied > ticket)
        {
            return false;
        }

        self.applied = Some((ticket, value));

        true
    }

    /// Latest applied value.
    pub fn current(&self) -> Option<&T> {
        self.applied.as_ref().map(|(_, value)| value)
    }

    /// Ticket of the latest applied value.
    pub fn ticket(&self) -> Option<QueryTicket> {
        self.applied.as_ref().map(|(ticket, _)| *ticket)
    }
}
