use lick_types::{ArtworkId, Mutez, PaymentRecord, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerError;
use crate::ledger::ArtworkLedger;
use crate::traits::LedgerStore;

/// How the processor treats an event time older than the pending record.
///
/// The execution environment is expected to supply non-decreasing times.
/// `Trust` takes it at its word: an older time finalizes the pending record
/// like any other change, which can leave `finalized` out of order.
/// `RejectRegression` refuses such a payment instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockPolicy {
    #[default]
    Trust,
    RejectRegression,
}

/// Folds payment events into per-artwork ledgers.
///
/// Payments carrying the timestamp of the pending record are added to it.
/// A payment with any other timestamp closes the pending record into the
/// finalized sequence and opens a new one. Storage therefore grows with
/// the number of distinct timestamps, not with the number of payments.
#[derive(Clone, Copy, Debug, Default)]
pub struct PaymentProcessor {
    policy: ClockPolicy,
}

impl PaymentProcessor {
    pub fn new(policy: ClockPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ClockPolicy {
        self.policy
    }

    /// Apply one payment to the stored ledger of `artwork`.
    ///
    /// The new ledger is computed in full before it is written back, so on
    /// error the store is untouched.
    pub fn process<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        artwork: &ArtworkId,
        amount: Mutez,
        event_time: Timestamp,
    ) -> Result<ArtworkLedger, LedgerError> {
        let updated = self.prepare(store, artwork, amount, event_time)?;
        store.put(artwork, updated.clone())?;
        Ok(updated)
    }

    /// The ledger `process` would write, without writing it.
    ///
    /// Callers with checks of their own run them between `prepare` and
    /// [`LedgerStore::put`].
    pub fn prepare<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        artwork: &ArtworkId,
        amount: Mutez,
        event_time: Timestamp,
    ) -> Result<ArtworkLedger, LedgerError> {
        let current = store.get(artwork)?;
        self.apply(&current, artwork, amount, event_time)
    }

    /// The merge rule on its own, without touching a store.
    pub fn apply(
        &self,
        ledger: &ArtworkLedger,
        artwork: &ArtworkId,
        amount: Mutez,
        event_time: Timestamp,
    ) -> Result<ArtworkLedger, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroOrNegativeAmount);
        }

        let mut next = ledger.clone();
        match ledger.pending() {
            None => {
                debug!(%artwork, %amount, time = %event_time, "opened pending record");
                next.set_pending(PaymentRecord::new(event_time, amount));
            }
            Some(pending) if pending.timestamp == event_time => {
                let total = pending
                    .amount
                    .checked_add(amount)
                    .ok_or_else(|| LedgerError::AmountOverflow {
                        artwork: artwork.clone(),
                    })?;
                debug!(%artwork, %amount, %total, time = %event_time, "accumulated into pending record");
                next.set_pending(PaymentRecord::new(event_time, total));
            }
            Some(pending) => {
                if self.policy == ClockPolicy::RejectRegression
                    && event_time.is_before(&pending.timestamp)
                {
                    return Err(LedgerError::ClockRegression {
                        artwork: artwork.clone(),
                        pending: pending.timestamp,
                        event: event_time,
                    });
                }
                next.finalize_pending();
                debug!(
                    %artwork,
                    closed_at = %pending.timestamp,
                    closed_amount = %pending.amount,
                    time = %event_time,
                    "finalized pending record"
                );
                next.set_pending(PaymentRecord::new(event_time, amount));
            }
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryLedgerStore;
    use crate::view::ViewComposer;
    use proptest::prelude::*;

    fn t(seconds: i64) -> Timestamp {
        Timestamp::from_unix(seconds)
    }

    fn m(amount: u64) -> Mutez {
        Mutez::new(amount)
    }

    fn record(seconds: i64, amount: u64) -> PaymentRecord {
        PaymentRecord::new(t(seconds), m(amount))
    }

    fn store_with(artwork: &str) -> (InMemoryLedgerStore, ArtworkId) {
        let store = InMemoryLedgerStore::new();
        let id = ArtworkId::new(artwork);
        store.register(&id).unwrap();
        (store, id)
    }

    #[test]
    fn first_payment_opens_pending() {
        let (store, id) = store_with("a1");
        let ledger = PaymentProcessor::default()
            .process(&store, &id, m(5), t(0))
            .unwrap();
        assert_eq!(ledger.pending(), Some(&record(0, 5)));
        assert_eq!(ledger.finalized_len(), 0);
        assert_eq!(store.get(&id).unwrap(), ledger);
    }

    #[test]
    fn same_timestamp_accumulates() {
        let (store, id) = store_with("a1");
        let processor = PaymentProcessor::default();
        processor.process(&store, &id, m(5), t(0)).unwrap();
        let ledger = processor.process(&store, &id, m(3), t(0)).unwrap();
        assert_eq!(ledger.pending(), Some(&record(0, 8)));
        assert_eq!(ledger.finalized_len(), 0);
    }

    #[test]
    fn new_timestamp_finalizes_pending() {
        let (store, id) = store_with("a1");
        let processor = PaymentProcessor::default();
        processor.process(&store, &id, m(5), t(0)).unwrap();
        processor.process(&store, &id, m(3), t(0)).unwrap();
        let ledger = processor.process(&store, &id, m(2), t(100)).unwrap();

        assert_eq!(ledger.finalized().copied().collect::<Vec<_>>(), vec![record(0, 8)]);
        assert_eq!(ledger.pending(), Some(&record(100, 2)));
    }

    #[test]
    fn zero_amount_is_rejected_without_change() {
        let (store, id) = store_with("a1");
        let processor = PaymentProcessor::default();
        processor.process(&store, &id, m(5), t(0)).unwrap();
        let before = store.get(&id).unwrap();

        let error = processor.process(&store, &id, Mutez::ZERO, t(10)).unwrap_err();
        assert_eq!(error, LedgerError::ZeroOrNegativeAmount);
        assert_eq!(store.get(&id).unwrap(), before);
    }

    #[test]
    fn apply_rejects_zero_amount() {
        let error = PaymentProcessor::default()
            .apply(&ArtworkLedger::new(), &ArtworkId::new("a1"), Mutez::ZERO, t(0))
            .unwrap_err();
        assert_eq!(error, LedgerError::ZeroOrNegativeAmount);
    }

    #[test]
    fn prepare_does_not_write() {
        let (store, id) = store_with("a1");
        let ledger = PaymentProcessor::default()
            .prepare(&store, &id, m(5), t(0))
            .unwrap();
        assert_eq!(ledger.pending(), Some(&record(0, 5)));
        assert!(store.get(&id).unwrap().is_empty());
    }

    #[test]
    fn unknown_artwork_is_rejected() {
        let store = InMemoryLedgerStore::new();
        let id = ArtworkId::new("nope");
        let error = PaymentProcessor::default()
            .process(&store, &id, m(1), t(0))
            .unwrap_err();
        assert_eq!(error, LedgerError::UnknownArtwork(id));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn overflow_leaves_ledger_unchanged() {
        let (store, id) = store_with("a1");
        let processor = PaymentProcessor::default();
        processor.process(&store, &id, m(u64::MAX), t(0)).unwrap();

        let error = processor.process(&store, &id, m(1), t(0)).unwrap_err();
        assert_eq!(error, LedgerError::AmountOverflow { artwork: id.clone() });
        assert_eq!(store.get(&id).unwrap().pending(), Some(&record(0, u64::MAX)));
    }

    #[test]
    fn trusted_clock_finalizes_older_event() {
        let (store, id) = store_with("a1");
        let processor = PaymentProcessor::new(ClockPolicy::Trust);
        processor.process(&store, &id, m(1), t(100)).unwrap();
        let ledger = processor.process(&store, &id, m(2), t(50)).unwrap();

        assert_eq!(ledger.pending(), Some(&record(50, 2)));
        assert_eq!(ledger.latest_finalized(), Some(&record(100, 1)));
    }

    #[test]
    fn strict_clock_rejects_older_event() {
        let (store, id) = store_with("a1");
        let processor = PaymentProcessor::new(ClockPolicy::RejectRegression);
        processor.process(&store, &id, m(1), t(100)).unwrap();

        let error = processor.process(&store, &id, m(2), t(50)).unwrap_err();
        assert_eq!(
            error,
            LedgerError::ClockRegression {
                artwork: id.clone(),
                pending: t(100),
                event: t(50),
            }
        );
        assert_eq!(store.get(&id).unwrap().pending(), Some(&record(100, 1)));

        // Equal and later times are still fine.
        processor.process(&store, &id, m(2), t(100)).unwrap();
        processor.process(&store, &id, m(2), t(150)).unwrap();
    }

    #[test]
    fn clock_policy_serde_names() {
        let json = serde_json::to_string(&ClockPolicy::RejectRegression).unwrap();
        assert_eq!(json, "\"reject_regression\"");
        let parsed: ClockPolicy = serde_json::from_str("\"trust\"").unwrap();
        assert_eq!(parsed, ClockPolicy::Trust);
    }

    fn payments() -> impl Strategy<Value = Vec<(i64, u64)>> {
        // Non-decreasing times built from small steps so that equal
        // timestamps come up often.
        prop::collection::vec((0i64..3, 1u64..1_000), 0..40).prop_map(|steps| {
            let mut now = 0;
            steps
                .into_iter()
                .map(|(step, amount)| {
                    now += step;
                    (now, amount)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn one_record_per_distinct_timestamp(events in payments()) {
            let (store, id) = store_with("a1");
            let processor = PaymentProcessor::default();
            for (time, amount) in &events {
                processor.process(&store, &id, m(*amount), t(*time)).unwrap();
            }

            let mut distinct: Vec<i64> = events.iter().map(|(time, _)| *time).collect();
            distinct.dedup();
            let view = ViewComposer::view(&store, &id).unwrap();
            prop_assert_eq!(view.len(), distinct.len());

            let newest_first: Vec<i64> = view.iter().map(|r| r.timestamp.as_unix()).collect();
            let mut expected = distinct.clone();
            expected.reverse();
            prop_assert_eq!(newest_first, expected);
        }

        #[test]
        fn consolidation_conserves_value(events in payments()) {
            let (store, id) = store_with("a1");
            let processor = PaymentProcessor::default();
            for (time, amount) in &events {
                processor.process(&store, &id, m(*amount), t(*time)).unwrap();
            }
            let paid: u64 = events.iter().map(|(_, amount)| amount).sum();
            prop_assert_eq!(ViewComposer::total(&store, &id).unwrap(), m(paid));
        }

        #[test]
        fn each_record_sums_its_timestamp(events in payments()) {
            let (store, id) = store_with("a1");
            let processor = PaymentProcessor::default();
            for (time, amount) in &events {
                processor.process(&store, &id, m(*amount), t(*time)).unwrap();
            }
            for record in ViewComposer::view(&store, &id).unwrap() {
                let expected: u64 = events
                    .iter()
                    .filter(|(time, _)| *time == record.timestamp.as_unix())
                    .map(|(_, amount)| amount)
                    .sum();
                prop_assert_eq!(record.amount, m(expected));
            }
        }
    }
}
