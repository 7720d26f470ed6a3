use lick_types::ArtworkId;

use crate::error::LedgerError;
use crate::ledger::ArtworkLedger;

/// Storage boundary for per-artwork ledgers.
///
/// All implementations must satisfy these invariants:
/// - A ledger exists only after `register` succeeded for its identifier.
/// - `register` never overwrites: a second registration is a `Conflict`.
/// - `put` replaces one whole ledger and only for registered identifiers.
/// - A failed call leaves the store unchanged.
pub trait LedgerStore: Send + Sync {
    /// Fetch a copy of the ledger for `artwork`.
    ///
    /// Returns `Err(UnknownArtwork)` if it was never registered.
    fn get(&self, artwork: &ArtworkId) -> Result<ArtworkLedger, LedgerError>;

    /// Create an empty ledger for `artwork`.
    fn register(&self, artwork: &ArtworkId) -> Result<(), LedgerError>;

    /// Replace the ledger for a registered `artwork`.
    fn put(&self, artwork: &ArtworkId, ledger: ArtworkLedger) -> Result<(), LedgerError>;

    /// Check whether `artwork` is registered.
    fn contains(&self, artwork: &ArtworkId) -> Result<bool, LedgerError>;

    /// All registered identifiers in ascending order.
    fn artwork_ids(&self) -> Result<Vec<ArtworkId>, LedgerError>;

    /// Number of registered artworks.
    fn len(&self) -> Result<usize, LedgerError> {
        self.artwork_ids().map(|ids| ids.len())
    }

    fn is_empty(&self) -> Result<bool, LedgerError> {
        self.len().map(|n| n == 0)
    }
}
