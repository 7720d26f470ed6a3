use lick_types::{Address, Mutez, Timestamp};
use serde::{Deserialize, Serialize};

/// What the execution environment attaches to every operation.
///
/// The sender, the attached amount and the current time arrive together
/// and are never read from anywhere else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationContext {
    pub sender: Address,
    #[serde(default)]
    pub amount: Mutez,
    pub now: Timestamp,
}

impl OperationContext {
    /// A context with no attached value.
    pub fn new(sender: Address, now: Timestamp) -> Self {
        Self {
            sender,
            amount: Mutez::ZERO,
            now,
        }
    }

    pub fn with_amount(mut self, amount: Mutez) -> Self {
        self.amount = amount;
        self
    }
}
