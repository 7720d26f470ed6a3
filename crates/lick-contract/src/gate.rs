use lick_types::Address;
use tracing::debug;

use crate::context::OperationContext;
use crate::error::ContractError;

/// Admin check for privileged operations.
///
/// Holds the current admin. Registration, admin rotation and withdrawal
/// call [`AdminGate::require`] before doing anything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminGate {
    admin: Address,
}

impl AdminGate {
    pub fn new(admin: Address) -> Self {
        Self { admin }
    }

    pub fn admin(&self) -> &Address {
        &self.admin
    }

    /// Fail with `Unauthorized` unless the sender is the admin.
    pub fn require(&self, ctx: &OperationContext, operation: &str) -> Result<(), ContractError> {
        if ctx.sender == self.admin {
            return Ok(());
        }
        debug!(caller = %ctx.sender.short(), operation, "rejected non-admin caller");
        Err(ContractError::Unauthorized {
            caller: ctx.sender.clone(),
        })
    }

    /// Replace the admin, returning the previous one.
    pub(crate) fn rotate(&mut self, new_admin: Address) -> Address {
        std::mem::replace(&mut self.admin, new_admin)
    }
}
