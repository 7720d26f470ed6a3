//! Foundation types for the Lick payment ledger.
//!
//! This crate provides the identity, amount, and temporal types shared by
//! every other Lick crate.
//!
//! # Key Types
//!
//! - [`Address`] — Opaque caller identity, compared for admin checks
//! - [`ArtworkId`] — Key under which payment activity is tracked
//! - [`Mutez`] — Non-negative amount in the minor currency unit
//! - [`Timestamp`] — Second-granularity instant supplied by the environment
//! - [`PaymentRecord`] — Amount received at one timestamp

pub mod amount;
pub mod error;
pub mod identity;
pub mod payment;
pub mod temporal;

pub use amount::Mutez;
pub use error::TypeError;
pub use identity::{Address, ArtworkId};
pub use payment::PaymentRecord;
pub use temporal::Timestamp;
