use std::collections::BTreeMap;

use lick_types::{ArtworkId, Mutez, PaymentRecord};

use crate::error::LedgerError;
use crate::ledger::ArtworkLedger;
use crate::traits::LedgerStore;

/// Read-only payment history builders.
///
/// Views are recomputed from the store on every call and never write back.
pub struct ViewComposer;

impl ViewComposer {
    /// History of one ledger, newest first, pending record included.
    pub fn compose(ledger: &ArtworkLedger) -> Vec<PaymentRecord> {
        ledger
            .pending()
            .into_iter()
            .chain(ledger.finalized())
            .copied()
            .collect()
    }

    pub fn view<S: LedgerStore + ?Sized>(
        store: &S,
        artwork: &ArtworkId,
    ) -> Result<Vec<PaymentRecord>, LedgerError> {
        let ledger = store.get(artwork)?;
        Ok(Self::compose(&ledger))
    }

    /// Sum of every amount recorded for `artwork`.
    pub fn total<S: LedgerStore + ?Sized>(
        store: &S,
        artwork: &ArtworkId,
    ) -> Result<Mutez, LedgerError> {
        Ok(store.get(artwork)?.total())
    }

    /// Sum of every amount recorded across all artworks.
    pub fn grand_total<S: LedgerStore + ?Sized>(store: &S) -> Result<Mutez, LedgerError> {
        store
            .artwork_ids()?
            .iter()
            .map(|artwork| store.get(artwork).map(|ledger| ledger.total()))
            .sum()
    }

    /// Views of every registered artwork, keyed by identifier.
    pub fn all<S: LedgerStore + ?Sized>(
        store: &S,
    ) -> Result<BTreeMap<ArtworkId, Vec<PaymentRecord>>, LedgerError> {
        store
            .artwork_ids()?
            .into_iter()
            .map(|artwork| {
                let records = Self::view(store, &artwork)?;
                Ok((artwork, records))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryLedgerStore;
    use crate::processor::PaymentProcessor;
    use lick_types::Timestamp;

    fn record(t: i64, amount: u64) -> PaymentRecord {
        PaymentRecord::new(Timestamp::from_unix(t), Mutez::new(amount))
    }

    #[test]
    fn compose_puts_pending_first() {
        let ledger = ArtworkLedger::from_parts([record(0, 8)], Some(record(100, 2)));
        assert_eq!(
            ViewComposer::compose(&ledger),
            vec![record(100, 2), record(0, 8)]
        );
    }

    #[test]
    fn compose_without_pending_is_finalized() {
        let ledger = ArtworkLedger::from_parts([record(50, 1), record(0, 8)], None);
        assert_eq!(
            ViewComposer::compose(&ledger),
            vec![record(50, 1), record(0, 8)]
        );
    }

    #[test]
    fn view_of_unknown_artwork_fails() {
        let store = InMemoryLedgerStore::new();
        let id = ArtworkId::new("ghost");
        assert_eq!(
            ViewComposer::view(&store, &id).unwrap_err(),
            LedgerError::UnknownArtwork(id)
        );
    }

    #[test]
    fn view_does_not_mutate() {
        let store = InMemoryLedgerStore::new();
        let id = ArtworkId::new("a1");
        store.register(&id).unwrap();
        PaymentProcessor::default()
            .process(&store, &id, Mutez::new(4), Timestamp::EPOCH)
            .unwrap();

        let before = store.get(&id).unwrap();
        let first = ViewComposer::view(&store, &id).unwrap();
        let second = ViewComposer::view(&store, &id).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.get(&id).unwrap(), before);
        assert!(store.get(&id).unwrap().pending().is_some());
    }

    #[test]
    fn grand_total_spans_artworks() {
        let store = InMemoryLedgerStore::new();
        let processor = PaymentProcessor::default();
        for (name, amount) in [("a1", 5), ("a2", 7)] {
            let id = ArtworkId::new(name);
            store.register(&id).unwrap();
            processor
                .process(&store, &id, Mutez::new(amount), Timestamp::EPOCH)
                .unwrap();
        }
        store.register(&ArtworkId::new("a3")).unwrap();

        assert_eq!(ViewComposer::grand_total(&store).unwrap(), Mutez::new(12));
        let all = ViewComposer::all(&store).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[&ArtworkId::new("a3")].is_empty());
    }
}
