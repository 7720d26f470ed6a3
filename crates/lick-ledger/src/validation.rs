use lick_types::{ArtworkId, Timestamp};
use serde::Serialize;

use crate::error::LedgerError;
use crate::ledger::ArtworkLedger;
use crate::traits::LedgerStore;

/// Result of validating one artwork ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub artwork: ArtworkId,
    pub record_count: usize,
    pub amounts_positive: bool,
    pub finalized_ordered: bool,
    pub pending_latest: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific problem found in a ledger.
///
/// `position` indexes the composed view: 0 is the pending record when one
/// exists, otherwise the newest finalized record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub position: usize,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    ZeroAmount,
    FinalizedOutOfOrder,
    PendingBehindFinalized,
}

/// Ledger invariant validator.
///
/// Checks that every stored amount is positive, that finalized timestamps
/// never increase from front to back, and that the pending record is not
/// older than the newest finalized one. Ledgers built only through
/// [`PaymentProcessor`](crate::PaymentProcessor) under a monotonic clock
/// always pass.
pub struct LedgerValidator;

impl LedgerValidator {
    pub fn validate_ledger(artwork: &ArtworkId, ledger: &ArtworkLedger) -> ValidationReport {
        let mut violations = Vec::new();
        let mut amounts_positive = true;
        let mut finalized_ordered = true;
        let mut pending_latest = true;
        let offset = usize::from(ledger.pending().is_some());

        if let Some(pending) = ledger.pending() {
            if pending.amount.is_zero() {
                amounts_positive = false;
                violations.push(zero_amount(0));
            }
            if let Some(newest) = ledger.latest_finalized() {
                if pending.timestamp < newest.timestamp {
                    pending_latest = false;
                    violations.push(Violation {
                        position: 0,
                        kind: ViolationKind::PendingBehindFinalized,
                        description: format!(
                            "pending at {} is older than finalized at {}",
                            pending.timestamp, newest.timestamp
                        ),
                    });
                }
            }
        }

        let mut newer: Option<Timestamp> = None;
        for (index, record) in ledger.finalized().enumerate() {
            let position = index + offset;
            if record.amount.is_zero() {
                amounts_positive = false;
                violations.push(zero_amount(position));
            }
            if let Some(newer) = newer {
                if record.timestamp > newer {
                    finalized_ordered = false;
                    violations.push(Violation {
                        position,
                        kind: ViolationKind::FinalizedOutOfOrder,
                        description: format!(
                            "finalized at {} follows newer-first record at {}",
                            record.timestamp, newer
                        ),
                    });
                }
            }
            newer = Some(record.timestamp);
        }

        ValidationReport {
            artwork: artwork.clone(),
            record_count: ledger.record_count(),
            amounts_positive,
            finalized_ordered,
            pending_latest,
            violations,
        }
    }

    pub fn validate<S: LedgerStore + ?Sized>(
        store: &S,
        artwork: &ArtworkId,
    ) -> Result<ValidationReport, LedgerError> {
        let ledger = store.get(artwork)?;
        Ok(Self::validate_ledger(artwork, &ledger))
    }

    /// Validate every registered artwork.
    pub fn validate_all<S: LedgerStore + ?Sized>(
        store: &S,
    ) -> Result<Vec<ValidationReport>, LedgerError> {
        let artworks = store.artwork_ids()?;
        let mut reports = Vec::with_capacity(artworks.len());
        for artwork in &artworks {
            reports.push(Self::validate(store, artwork)?);
        }
        Ok(reports)
    }
}

fn zero_amount(position: usize) -> Violation {
    Violation {
        position,
        kind: ViolationKind::ZeroAmount,
        description: "record amount is zero".into(),
    }
}
