//! The Lick payment contract.
//!
//! Wraps the per-artwork ledger in the operations an external caller can
//! invoke: admin-gated artwork registration, payable `pay`, admin rotation,
//! full-balance withdrawal, and read-only payment history. Each operation
//! is validated in full before anything is written, so a rejected call has
//! no observable effect.
//!
//! # Quick Start
//!
//! ```rust
//! use lick_contract::{LickContract, OperationContext, RecordingTransfer};
//! use lick_types::{Address, ArtworkId, Mutez, Timestamp};
//!
//! let admin = Address::test_account("Admin");
//! let buyer = Address::test_account("Buyer");
//! let mut contract = LickContract::new(admin.clone());
//! let artwork = ArtworkId::new("artwork_1");
//!
//! contract
//!     .register_artwork(&OperationContext::new(admin.clone(), Timestamp::EPOCH), artwork.clone())
//!     .unwrap();
//! contract
//!     .pay(
//!         &OperationContext::new(buyer, Timestamp::EPOCH).with_amount(Mutez::from_tez(1)),
//!         &artwork,
//!     )
//!     .unwrap();
//!
//! let mut bank = RecordingTransfer::default();
//! let sent = contract
//!     .withdraw(&OperationContext::new(admin, Timestamp::EPOCH), &mut bank)
//!     .unwrap();
//! assert_eq!(sent, Mutez::from_tez(1));
//! ```

pub mod config;
pub mod context;
pub mod contract;
pub mod error;
pub mod gate;
pub mod journal;
pub mod transfer;

pub use config::ContractConfig;
pub use context::OperationContext;
pub use contract::{ContractSnapshot, LickContract};
pub use error::{ContractError, ContractResult};
pub use gate::AdminGate;
pub use journal::{OperationId, OperationJournal, OperationKind, OperationReceipt};
pub use transfer::{RecordingTransfer, Transfer, TransferError, TransferSink};

// Re-export key types
pub use lick_ledger::{ArtworkLedger, ClockPolicy, LedgerError, ValidationReport};
pub use lick_types::{Address, ArtworkId, Mutez, PaymentRecord, Timestamp};
