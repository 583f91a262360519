//! Per-request guard against concurrent moderation of the same id.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use winner_core::PurchaseRequestId;

/// Request ids with an approve or reject outstanding.
#[derive(Debug, Default)]
pub(super) struct InFlightRequests {
    ids: Mutex<HashSet<PurchaseRequestId>>,
}

impl InFlightRequests {
    /// Claim `id`. Returns `None` if it is already claimed.
    pub(super) fn acquire(&self, id: PurchaseRequestId) -> Option<InFlightTicket<'_>> {
        let inserted = self
            .ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);
        inserted.then_some(InFlightTicket { owner: self, id })
    }

    fn release(&self, id: PurchaseRequestId) {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    #[cfg(test)]
    pub(super) fn contains(&self, id: PurchaseRequestId) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }
}

/// Releases its id when dropped.
#[derive(Debug)]
pub(super) struct InFlightTicket<'a> {
    owner: &'a InFlightRequests,
    id: PurchaseRequestId,
}

impl Drop for InFlightTicket<'_> {
    fn drop(&mut self) {
        self.owner.release(self.id);
    }
}
