use std::collections::VecDeque;

use lick_types::{Mutez, PaymentRecord};
use serde::{Deserialize, Serialize};

/// Payment history of one artwork.
///
/// `finalized` is ordered newest first; records only ever enter it at the
/// front. `pending` is the single bucket still accepting payments for the
/// most recent timestamp. Keeping it an `Option` rather than a list makes
/// "at most one pending record" hold by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkLedger {
    finalized: VecDeque<PaymentRecord>,
    pending: Option<PaymentRecord>,
}

impl ArtworkLedger {
    /// An empty ledger, as created at registration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from stored parts. `finalized` must be newest first.
    ///
    /// No invariants are checked here; use
    /// [`LedgerValidator`](crate::LedgerValidator) on ledgers from untrusted
    /// sources.
    pub fn from_parts(
        finalized: impl IntoIterator<Item = PaymentRecord>,
        pending: Option<PaymentRecord>,
    ) -> Self {
        Self {
            finalized: finalized.into_iter().collect(),
            pending,
        }
    }

    /// Finalized records, newest first.
    pub fn finalized(&self) -> impl ExactSizeIterator<Item = &PaymentRecord> + '_ {
        self.finalized.iter()
    }

    pub fn pending(&self) -> Option<&PaymentRecord> {
        self.pending.as_ref()
    }

    /// The most recently finalized record, if any.
    pub fn latest_finalized(&self) -> Option<&PaymentRecord> {
        self.finalized.front()
    }

    pub fn finalized_len(&self) -> usize {
        self.finalized.len()
    }

    /// Number of records a view of this ledger contains.
    pub fn record_count(&self) -> usize {
        self.finalized.len() + usize::from(self.pending.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none() && self.finalized.is_empty()
    }

    /// Sum of all finalized and pending amounts.
    pub fn total(&self) -> Mutez {
        self.finalized
            .iter()
            .chain(self.pending.iter())
            .map(|record| record.amount)
            .sum()
    }

    /// Close the pending record, if any, into the front of `finalized`.
    pub(crate) fn finalize_pending(&mut self) -> Option<PaymentRecord> {
        let closed = self.pending.take()?;
        self.finalized.push_front(closed);
        Some(closed)
    }

    pub(crate) fn set_pending(&mut self, record: PaymentRecord) {
        self.pending = Some(record);
    }
}
