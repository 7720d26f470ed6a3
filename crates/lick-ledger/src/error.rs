use lick_types::{ArtworkId, Timestamp};

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("unknown artwork: {0}")]
    UnknownArtwork(ArtworkId),

    #[error("artwork already registered: {0}")]
    Conflict(ArtworkId),

    #[error("payment amount must be strictly positive")]
    ZeroOrNegativeAmount,

    #[error("accumulated amount for {artwork} overflows")]
    AmountOverflow { artwork: ArtworkId },

    #[error("clock moved backwards for {artwork}: event at {event}, pending at {pending}")]
    ClockRegression {
        artwork: ArtworkId,
        pending: Timestamp,
        event: Timestamp,
    },

    #[error("ledger store lock poisoned: {0}")]
    LockPoisoned(String),
}
