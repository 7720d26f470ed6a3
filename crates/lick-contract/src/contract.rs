use std::collections::BTreeMap;

use lick_ledger::{
    ArtworkLedger, InMemoryLedgerStore, LedgerStore, LedgerValidator, PaymentProcessor,
    ValidationReport, ViewComposer,
};
use lick_types::{Address, ArtworkId, Mutez, PaymentRecord, Timestamp};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ContractConfig;
use crate::context::OperationContext;
use crate::error::{ContractError, ContractResult};
use crate::gate::AdminGate;
use crate::journal::{OperationJournal, OperationKind};
use crate::transfer::TransferSink;

/// Serializable picture of the whole contract state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContractSnapshot {
    pub admin: Address,
    pub balance: Mutez,
    pub total_received: Mutez,
    pub artworks: BTreeMap<ArtworkId, Vec<PaymentRecord>>,
}

/// Registry of artwork ledgers plus the admin and the held balance.
///
/// Every mutating operation takes `&mut self` and runs to completion
/// before the next one starts. Preconditions are checked before the first
/// write, so an `Err` return means nothing changed.
pub struct LickContract<S: LedgerStore = InMemoryLedgerStore> {
    store: S,
    gate: AdminGate,
    processor: PaymentProcessor,
    balance: Mutez,
    total_received: Mutez,
    journal: OperationJournal,
}

impl LickContract<InMemoryLedgerStore> {
    /// A contract with an empty in-memory registry and default settings.
    pub fn new(admin: Address) -> Self {
        Self::with_store(admin, InMemoryLedgerStore::new(), PaymentProcessor::default())
    }

    /// Originate a contract from configuration.
    ///
    /// Configured artworks are registered by the admin at `now` and appear
    /// in the journal like any other registration.
    pub fn originate(config: &ContractConfig, now: Timestamp) -> ContractResult<Self> {
        let mut contract = Self::with_store(
            config.admin.clone(),
            InMemoryLedgerStore::new(),
            PaymentProcessor::new(config.clock_policy),
        );
        let ctx = OperationContext::new(config.admin.clone(), now);
        for artwork in &config.artworks {
            contract.register_artwork(&ctx, artwork.clone())?;
        }
        info!(
            admin = %config.admin,
            artworks = config.artworks.len(),
            policy = ?contract.processor.policy(),
            "contract originated"
        );
        Ok(contract)
    }
}

impl<S: LedgerStore> LickContract<S> {
    pub fn with_store(admin: Address, store: S, processor: PaymentProcessor) -> Self {
        Self {
            store,
            gate: AdminGate::new(admin),
            processor,
            balance: Mutez::ZERO,
            total_received: Mutez::ZERO,
            journal: OperationJournal::new(),
        }
    }

    // ---- Operations ----

    /// Admin only: create an empty ledger for `artwork`.
    pub fn register_artwork(
        &mut self,
        ctx: &OperationContext,
        artwork: ArtworkId,
    ) -> ContractResult<()> {
        self.gate.require(ctx, "register_artwork")?;
        reject_attached_amount(ctx)?;
        self.store.register(&artwork).inspect_err(|e| {
            debug!(%artwork, error = %e, "registration rejected");
        })?;

        info!(%artwork, "artwork registered");
        self.journal.record(
            &ctx.sender,
            ctx.now,
            OperationKind::ArtworkRegistered { artwork },
        );
        Ok(())
    }

    /// Anyone: pay the attached amount towards `artwork`.
    ///
    /// Returns the artwork's ledger after the payment was merged.
    pub fn pay(
        &mut self,
        ctx: &OperationContext,
        artwork: &ArtworkId,
    ) -> ContractResult<ArtworkLedger> {
        let amount = ctx.amount;
        let ledger = self
            .processor
            .prepare(&self.store, artwork, amount, ctx.now)
            .inspect_err(|e| {
                debug!(%artwork, %amount, sender = %ctx.sender, error = %e, "payment rejected");
            })?;

        let balance = self.balance.checked_add(amount);
        let total_received = self.total_received.checked_add(amount);
        let (Some(balance), Some(total_received)) = (balance, total_received) else {
            debug!(%artwork, %amount, balance = %self.balance, "payment would overflow balance");
            return Err(ContractError::BalanceOverflow);
        };
        self.store.put(artwork, ledger.clone())?;

        self.balance = balance;
        self.total_received = total_received;
        debug!(%artwork, %amount, sender = %ctx.sender, balance = %self.balance, "payment accepted");
        self.journal.record(
            &ctx.sender,
            ctx.now,
            OperationKind::PaymentAccepted {
                artwork: artwork.clone(),
                amount,
            },
        );
        Ok(ledger)
    }

    /// Admin only: hand the admin role to `new_admin`.
    pub fn rotate_admin(
        &mut self,
        ctx: &OperationContext,
        new_admin: Address,
    ) -> ContractResult<()> {
        self.gate.require(ctx, "rotate_admin")?;
        reject_attached_amount(ctx)?;

        let previous = self.gate.rotate(new_admin.clone());
        info!(from = %previous, to = %new_admin, "admin rotated");
        self.journal.record(
            &ctx.sender,
            ctx.now,
            OperationKind::AdminRotated {
                from: previous,
                to: new_admin,
            },
        );
        Ok(())
    }

    /// Admin only: send the entire held balance to the admin.
    ///
    /// A zero balance is not an error; the sink is still called once with a
    /// zero amount. If the sink fails the balance is kept.
    pub fn withdraw(
        &mut self,
        ctx: &OperationContext,
        sink: &mut dyn TransferSink,
    ) -> ContractResult<Mutez> {
        self.gate.require(ctx, "withdraw")?;
        reject_attached_amount(ctx)?;

        let amount = self.balance;
        let to = self.gate.admin().clone();
        sink.send(&to, amount)?;

        self.balance = Mutez::ZERO;
        info!(%to, %amount, "balance withdrawn");
        self.journal
            .record(&ctx.sender, ctx.now, OperationKind::Withdrawn { to, amount });
        Ok(amount)
    }

    /// Anyone: payment history of `artwork`, newest first.
    pub fn get_payments(&self, artwork: &ArtworkId) -> ContractResult<Vec<PaymentRecord>> {
        Ok(ViewComposer::view(&self.store, artwork)?)
    }

    // ---- Read access ----

    pub fn admin(&self) -> &Address {
        self.gate.admin()
    }

    /// Value currently held (received and not yet withdrawn).
    pub fn balance(&self) -> Mutez {
        self.balance
    }

    /// Value received over the contract's lifetime.
    pub fn total_received(&self) -> Mutez {
        self.total_received
    }

    pub fn artworks(&self) -> ContractResult<Vec<ArtworkId>> {
        Ok(self.store.artwork_ids()?)
    }

    pub fn ledger(&self, artwork: &ArtworkId) -> ContractResult<ArtworkLedger> {
        Ok(self.store.get(artwork)?)
    }

    pub fn journal(&self) -> &OperationJournal {
        &self.journal
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the recorded payments add up to everything ever received.
    pub fn is_conserved(&self) -> ContractResult<bool> {
        Ok(ViewComposer::grand_total(&self.store)? == self.total_received)
    }

    pub fn validate(&self) -> ContractResult<Vec<ValidationReport>> {
        Ok(LedgerValidator::validate_all(&self.store)?)
    }

    pub fn snapshot(&self) -> ContractResult<ContractSnapshot> {
        Ok(ContractSnapshot {
            admin: self.admin().clone(),
            balance: self.balance,
            total_received: self.total_received,
            artworks: ViewComposer::all(&self.store)?,
        })
    }
}

fn reject_attached_amount(ctx: &OperationContext) -> ContractResult<()> {
    if ctx.amount.is_zero() {
        Ok(())
    } else {
        Err(ContractError::UnexpectedAmount { amount: ctx.amount })
    }
}
