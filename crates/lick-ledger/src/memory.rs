use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use lick_types::ArtworkId;

use crate::error::LedgerError;
use crate::ledger::ArtworkLedger;
use crate::traits::LedgerStore;

type Ledgers = BTreeMap<ArtworkId, ArtworkLedger>;

/// In-memory ledger store for tests, local scenarios, and embedding.
///
/// Ledgers live in a `BTreeMap` behind a `RwLock`, so identifiers iterate
/// in sorted order and reads are cheap clones.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<Ledgers>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledgers>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("ledger read lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledgers>, LedgerError> {
        self.inner
            .write()
            .map_err(|_| LedgerError::LockPoisoned("ledger write lock poisoned".into()))
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn get(&self, artwork: &ArtworkId) -> Result<ArtworkLedger, LedgerError> {
        self.read()?
            .get(artwork)
            .cloned()
            .ok_or_else(|| LedgerError::UnknownArtwork(artwork.clone()))
    }

    fn register(&self, artwork: &ArtworkId) -> Result<(), LedgerError> {
        match self.write()?.entry(artwork.clone()) {
            Entry::Occupied(_) => Err(LedgerError::Conflict(artwork.clone())),
            Entry::Vacant(slot) => {
                slot.insert(ArtworkLedger::new());
                Ok(())
            }
        }
    }

    fn put(&self, artwork: &ArtworkId, ledger: ArtworkLedger) -> Result<(), LedgerError> {
        let mut ledgers = self.write()?;
        let slot = ledgers
            .get_mut(artwork)
            .ok_or_else(|| LedgerError::UnknownArtwork(artwork.clone()))?;
        *slot = ledger;
        Ok(())
    }

    fn contains(&self, artwork: &ArtworkId) -> Result<bool, LedgerError> {
        Ok(self.read()?.contains_key(artwork))
    }

    fn artwork_ids(&self) -> Result<Vec<ArtworkId>, LedgerError> {
        Ok(self.read()?.keys().cloned().collect())
    }

    fn len(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lick_types::{Mutez, PaymentRecord, Timestamp};

    fn id(s: &str) -> ArtworkId {
        ArtworkId::new(s)
    }

    #[test]
    fn register_creates_empty_ledger() {
        let store = InMemoryLedgerStore::new();
        store.register(&id("a1")).unwrap();
        assert!(store.get(&id("a1")).unwrap().is_empty());
        assert!(store.contains(&id("a1")).unwrap());
    }

    #[test]
    fn get_unknown_artwork_fails() {
        let store = InMemoryLedgerStore::new();
        assert_eq!(
            store.get(&id("missing")).unwrap_err(),
            LedgerError::UnknownArtwork(id("missing"))
        );
    }

    #[test]
    fn duplicate_registration_conflicts_and_keeps_ledger() {
        let store = InMemoryLedgerStore::new();
        store.register(&id("a1")).unwrap();

        let ledger = ArtworkLedger::from_parts(
            [],
            Some(PaymentRecord::new(Timestamp::EPOCH, Mutez::new(5))),
        );
        store.put(&id("a1"), ledger.clone()).unwrap();

        assert_eq!(
            store.register(&id("a1")).unwrap_err(),
            LedgerError::Conflict(id("a1"))
        );
        assert_eq!(store.get(&id("a1")).unwrap(), ledger);
    }

    #[test]
    fn put_requires_registration() {
        let store = InMemoryLedgerStore::new();
        let error = store.put(&id("a1"), ArtworkLedger::new()).unwrap_err();
        assert_eq!(error, LedgerError::UnknownArtwork(id("a1")));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn artwork_ids_are_sorted() {
        let store = InMemoryLedgerStore::new();
        for name in ["b", "c", "a"] {
            store.register(&id(name)).unwrap();
        }
        assert_eq!(store.artwork_ids().unwrap(), vec![id("a"), id("b"), id("c")]);
        assert_eq!(store.len().unwrap(), 3);
    }
}
