use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::Mutez;
use crate::temporal::Timestamp;

/// Total amount received for an artwork at one timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub timestamp: Timestamp,
    pub amount: Mutez,
}

impl PaymentRecord {
    pub const fn new(timestamp: Timestamp, amount: Mutez) -> Self {
        Self { timestamp, amount }
    }
}

impl fmt::Display for PaymentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.amount, self.timestamp)
    }
}
