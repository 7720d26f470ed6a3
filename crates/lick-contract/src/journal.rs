use std::fmt;

use lick_types::{Address, ArtworkId, Mutez, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a journaled operation (UUID v7, time-ordered).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(Uuid);

impl OperationId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperationId({})", self.0)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State change performed by a successful operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationKind {
    ArtworkRegistered { artwork: ArtworkId },
    PaymentAccepted { artwork: ArtworkId, amount: Mutez },
    AdminRotated { from: Address, to: Address },
    Withdrawn { to: Address, amount: Mutez },
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArtworkRegistered { artwork } => write!(f, "register {artwork}"),
            Self::PaymentAccepted { artwork, amount } => write!(f, "pay {amount} for {artwork}"),
            Self::AdminRotated { from, to } => write!(f, "rotate admin {from} -> {to}"),
            Self::Withdrawn { to, amount } => write!(f, "withdraw {amount} to {to}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationReceipt {
    pub seq: u64,
    pub id: OperationId,
    pub sender: Address,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub kind: OperationKind,
}

/// Append-only log of successful operations.
///
/// Sequence numbers start at 1 and have no gaps. Rejected operations are
/// never recorded.
#[derive(Clone, Debug, Default)]
pub struct OperationJournal {
    receipts: Vec<OperationReceipt>,
}

impl OperationJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(
        &mut self,
        sender: &Address,
        timestamp: Timestamp,
        kind: OperationKind,
    ) -> &OperationReceipt {
        let seq = self.receipts.len() as u64 + 1;
        self.receipts.push(OperationReceipt {
            seq,
            id: OperationId::new(),
            sender: sender.clone(),
            timestamp,
            kind,
        });
        &self.receipts[self.receipts.len() - 1]
    }

    pub fn receipts(&self) -> &[OperationReceipt] {
        &self.receipts
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(journal: &mut OperationJournal, name: &str) {
        journal.record(
            &Address::test_account("Admin"),
            Timestamp::EPOCH,
            OperationKind::ArtworkRegistered {
                artwork: ArtworkId::new(name),
            },
        );
    }

    #[test]
    fn sequence_starts_at_one_without_gaps() {
        let mut journal = OperationJournal::new();
        for name in ["a", "b", "c"] {
            register(&mut journal, name);
        }
        let seqs: Vec<_> = journal.receipts().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn ids_are_unique() {
        let mut journal = OperationJournal::new();
        register(&mut journal, "a");
        register(&mut journal, "b");
        assert_ne!(journal.receipts()[0].id, journal.receipts()[1].id);
    }

    #[test]
    fn receipt_json_is_flat() {
        let mut journal = OperationJournal::new();
        register(&mut journal, "artwork_1");
        let json = serde_json::to_value(&journal.receipts()[0]).unwrap();
        assert_eq!(json["seq"], 1);
        assert_eq!(json["kind"], "artwork_registered");
        assert_eq!(json["artwork"], "artwork_1");
    }
}
