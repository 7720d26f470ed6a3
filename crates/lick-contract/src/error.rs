use lick_types::{Address, Mutez};
use thiserror::Error;

use crate::transfer::TransferError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("caller {caller} is not the admin")]
    Unauthorized { caller: Address },

    #[error("operation does not accept an attached amount (got {amount})")]
    UnexpectedAmount { amount: Mutez },

    #[error("held balance would overflow")]
    BalanceOverflow,

    #[error("transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] lick_ledger::LedgerError),
}

pub type ContractResult<T> = Result<T, ContractError>;
