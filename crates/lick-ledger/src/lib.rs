//! Per-artwork payment ledger for Lick.
//!
//! This crate is the heart of Lick. It provides:
//! - [`ArtworkLedger`]: finalized payment records (newest first) plus at most
//!   one pending record still open for the latest timestamp
//! - [`LedgerStore`] trait boundary and the [`InMemoryLedgerStore`] backend
//! - [`PaymentProcessor`]: the merge rule that folds payments at equal
//!   timestamps into one record and finalizes on forward progress
//! - [`ViewComposer`]: read-only history reconstruction
//! - [`LedgerValidator`]: ordering and positivity checks over stored ledgers

pub mod error;
pub mod ledger;
pub mod memory;
pub mod processor;
pub mod traits;
pub mod validation;
pub mod view;

pub use error::LedgerError;
pub use ledger::ArtworkLedger;
pub use memory::InMemoryLedgerStore;
pub use processor::{ClockPolicy, PaymentProcessor};
pub use traits::LedgerStore;
pub use validation::{LedgerValidator, ValidationReport, Violation, ViolationKind};
pub use view::ViewComposer;
