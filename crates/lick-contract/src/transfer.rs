use lick_types::{Address, Mutez};
use serde::{Deserialize, Serialize};

/// Errors reported by a [`TransferSink`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("transfer of {amount} to {to} rejected: {reason}")]
    Rejected {
        to: Address,
        amount: Mutez,
        reason: String,
    },
}

/// Value transfer primitive provided by the execution environment.
///
/// A call either moves the whole amount or fails without moving anything.
pub trait TransferSink {
    fn send(&mut self, to: &Address, amount: Mutez) -> Result<(), TransferError>;
}

/// One completed transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub to: Address,
    pub amount: Mutez,
}

/// Sink that records every transfer, for tests and local scenarios.
#[derive(Clone, Debug, Default)]
pub struct RecordingTransfer {
    transfers: Vec<Transfer>,
}

impl RecordingTransfer {
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Total amount sent to `to`.
    pub fn received_by(&self, to: &Address) -> Mutez {
        self.transfers
            .iter()
            .filter(|t| &t.to == to)
            .map(|t| t.amount)
            .sum()
    }
}

impl TransferSink for RecordingTransfer {
    fn send(&mut self, to: &Address, amount: Mutez) -> Result<(), TransferError> {
        self.transfers.push(Transfer {
            to: to.clone(),
            amount,
        });
        Ok(())
    }
}
