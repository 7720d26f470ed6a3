use std::path::Path;

use lick_ledger::ClockPolicy;
use lick_types::{Address, ArtworkId};
use serde::{Deserialize, Serialize};

use crate::error::ContractError;

/// Origination parameters for a [`LickContract`](crate::LickContract).
///
/// ```toml
/// admin = "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb"
/// clock_policy = "reject_regression"
/// artworks = ["artwork_1", "artwork_2"]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractConfig {
    /// Initial admin address.
    pub admin: Address,
    /// How payments with an event time older than the pending record are
    /// handled. Defaults to trusting the environment's clock.
    #[serde(default)]
    pub clock_policy: ClockPolicy,
    /// Artworks registered at origination, in order.
    #[serde(default)]
    pub artworks: Vec<ArtworkId>,
}

impl ContractConfig {
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            clock_policy: ClockPolicy::default(),
            artworks: Vec::new(),
        }
    }

    pub fn with_clock_policy(mut self, policy: ClockPolicy) -> Self {
        self.clock_policy = policy;
        self
    }

    pub fn with_artworks(mut self, artworks: impl IntoIterator<Item = ArtworkId>) -> Self {
        self.artworks.extend(artworks);
        self
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ContractError> {
        toml::from_str(source).map_err(|e| ContractError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ContractError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String, ContractError> {
        toml::to_string(self).map_err(|e| ContractError::Config(e.to_string()))
    }
}
