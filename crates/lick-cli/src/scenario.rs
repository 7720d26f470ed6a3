//! Scripted operation sequences.
//!
//! A scenario names a contract configuration and an ordered list of
//! operations, each with an explicit sender and time. Running it feeds the
//! operations to a fresh contract one at a time; a rejected operation is
//! recorded and the run continues.
//!
//! Senders and admins are account names. A name listed under `[accounts]`
//! resolves to that address; any other name resolves to the deterministic
//! test account derived from it.
//!
//! Amounts are integer mutez or a tez string (`"1.5tez"`). Times are integer
//! UNIX seconds or a quoted RFC 3339 string (`"2024-05-01T12:00:00Z"`).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use lick_contract::{
    ContractConfig, ContractSnapshot, LickContract, OperationContext, OperationReceipt,
    RecordingTransfer, Transfer,
};
use lick_ledger::{ClockPolicy, ValidationReport};
use lick_types::{Address, ArtworkId, Mutez, PaymentRecord, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub admin: String,
    #[serde(default)]
    pub clock_policy: ClockPolicy,
    #[serde(default)]
    pub artworks: Vec<ArtworkId>,
    #[serde(default)]
    pub accounts: BTreeMap<String, Address>,
    #[serde(default)]
    pub operations: Vec<Step>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Register {
        sender: String,
        artwork: ArtworkId,
        #[serde(default, deserialize_with = "unix_or_rfc3339")]
        time: Timestamp,
    },
    Pay {
        sender: String,
        artwork: ArtworkId,
        #[serde(deserialize_with = "mutez_or_tez")]
        amount: Mutez,
        #[serde(deserialize_with = "unix_or_rfc3339")]
        time: Timestamp,
    },
    RotateAdmin {
        sender: String,
        new_admin: String,
        #[serde(default, deserialize_with = "unix_or_rfc3339")]
        time: Timestamp,
    },
    Withdraw {
        sender: String,
        #[serde(default, deserialize_with = "unix_or_rfc3339")]
        time: Timestamp,
    },
    View {
        artwork: ArtworkId,
    },
}

/// A bare number, or a string in the value's text form.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<N> {
    Number(N),
    Text(String),
}

fn mutez_or_tez<'de, D>(deserializer: D) -> Result<Mutez, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match NumberOrText::<u64>::deserialize(deserializer)? {
        NumberOrText::Number(mutez) => Ok(Mutez::new(mutez)),
        NumberOrText::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

fn unix_or_rfc3339<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match NumberOrText::<i64>::deserialize(deserializer)? {
        NumberOrText::Number(seconds) => Ok(Timestamp::from_unix(seconds)),
        NumberOrText::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

impl Step {
    fn describe(&self) -> String {
        match self {
            Self::Register { sender, artwork, .. } => format!("{sender}: register {artwork}"),
            Self::Pay {
                sender,
                artwork,
                amount,
                time,
            } => format!("{sender}: pay {amount} for {artwork} at {}", time.as_unix()),
            Self::RotateAdmin {
                sender, new_admin, ..
            } => format!("{sender}: rotate admin to {new_admin}"),
            Self::Withdraw { sender, .. } => format!("{sender}: withdraw"),
            Self::View { artwork } => format!("view {artwork}"),
        }
    }
}

/// What a single step produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepResult {
    Registered,
    Paid { pending: Option<PaymentRecord>, finalized: usize },
    AdminRotated { admin: Address },
    Withdrawn { amount: Mutez },
    Viewed { records: Vec<PaymentRecord> },
    Rejected { error: String },
}

#[derive(Clone, Debug, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub description: String,
    #[serde(flatten)]
    pub result: StepResult,
}

impl StepOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self.result, StepResult::Rejected { .. })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ScenarioReport {
    pub outcomes: Vec<StepOutcome>,
    pub state: ContractSnapshot,
    pub transfers: Vec<Transfer>,
    pub journal: Vec<OperationReceipt>,
    pub validation: Vec<ValidationReport>,
    pub conserved: bool,
}

impl ScenarioReport {
    pub fn rejected(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_rejected()).count()
    }
}

impl Scenario {
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        toml::from_str(source).context("invalid scenario")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("in {}", path.display()))
    }

    fn resolve(&self, name: &str) -> Address {
        self.accounts
            .get(name)
            .cloned()
            .unwrap_or_else(|| Address::test_account(name))
    }

    pub fn config(&self) -> ContractConfig {
        ContractConfig::new(self.resolve(&self.admin))
            .with_clock_policy(self.clock_policy)
            .with_artworks(self.artworks.iter().cloned())
    }

    pub fn run(&self) -> anyhow::Result<ScenarioReport> {
        let mut contract = LickContract::originate(&self.config(), Timestamp::EPOCH)
            .context("originating contract")?;
        let mut bank = RecordingTransfer::default();

        let outcomes = self
            .operations
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let result = self.apply(&mut contract, &mut bank, step);
                if let StepResult::Rejected { error } = &result {
                    debug!(step = index + 1, %error, "operation rejected");
                } else {
                    debug!(step = index + 1, "operation applied");
                }
                StepOutcome {
                    index: index + 1,
                    description: step.describe(),
                    result,
                }
            })
            .collect();

        Ok(ScenarioReport {
            outcomes,
            state: contract.snapshot()?,
            transfers: bank.transfers().to_vec(),
            journal: contract.journal().receipts().to_vec(),
            validation: contract.validate()?,
            conserved: contract.is_conserved()?,
        })
    }

    fn apply(
        &self,
        contract: &mut LickContract,
        bank: &mut RecordingTransfer,
        step: &Step,
    ) -> StepResult {
        let result = match step {
            Step::Register {
                sender,
                artwork,
                time,
            } => contract
                .register_artwork(&self.context(sender, *time), artwork.clone())
                .map(|()| StepResult::Registered),
            Step::Pay {
                sender,
                artwork,
                amount,
                time,
            } => {
                let ctx = self.context(sender, *time).with_amount(*amount);
                contract.pay(&ctx, artwork).map(|ledger| StepResult::Paid {
                    pending: ledger.pending().copied(),
                    finalized: ledger.finalized_len(),
                })
            }
            Step::RotateAdmin {
                sender,
                new_admin,
                time,
            } => {
                let new_admin = self.resolve(new_admin);
                contract
                    .rotate_admin(&self.context(sender, *time), new_admin.clone())
                    .map(|()| StepResult::AdminRotated { admin: new_admin })
            }
            Step::Withdraw { sender, time } => contract
                .withdraw(&self.context(sender, *time), bank)
                .map(|amount| StepResult::Withdrawn { amount }),
            Step::View { artwork } => contract
                .get_payments(artwork)
                .map(|records| StepResult::Viewed { records }),
        };
        result.unwrap_or_else(|e| StepResult::Rejected {
            error: e.to_string(),
        })
    }

    fn context(&self, sender: &str, time: Timestamp) -> OperationContext {
        OperationContext::new(self.resolve(sender), time)
    }
}

/// Scenario from the payment consolidation walkthrough: two payments in one
/// second merge, a later one finalizes them, and the admin withdraws twice.
pub const DEMO_SCENARIO: &str = r#"
admin = "Admin"
artworks = ["a1"]

[[operations]]
op = "pay"
sender = "Buyer"
artwork = "a1"
amount = 5
time = 0

[[operations]]
op = "pay"
sender = "Collector"
artwork = "a1"
amount = 3
time = 0

[[operations]]
op = "view"
artwork = "a1"

[[operations]]
op = "pay"
sender = "Buyer"
artwork = "a1"
amount = 2
time = 100

[[operations]]
op = "view"
artwork = "a1"

[[operations]]
op = "withdraw"
sender = "Buyer"
time = 150

[[operations]]
op = "withdraw"
sender = "Admin"
time = 200

[[operations]]
op = "withdraw"
sender = "Admin"
time = 300
"#;
