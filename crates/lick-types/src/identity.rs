use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Opaque identity of an operation's caller.
///
/// The ledger never interprets an address beyond equality: it is compared
/// against the admin on gated operations and recorded in the journal.
/// Addresses are validated on parse (non-empty, no whitespace) so that a
/// malformed identity can never become the admin.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse an address, rejecting empty strings and embedded whitespace.
    pub fn parse(s: impl Into<String>) -> Result<Self, TypeError> {
        let s = s.into();
        if s.is_empty() {
            return Err(TypeError::InvalidAddress("address is empty".into()));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidAddress(format!(
                "address contains whitespace: {s:?}"
            )));
        }
        Ok(Self(s))
    }

    /// Derive a deterministic account address from a label.
    ///
    /// The same label always yields the same address, so scenarios can name
    /// their participants ("Admin", "Buyer") instead of spelling out keys.
    pub fn test_account(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"lick-account-v1:");
        hasher.update(label.as_bytes());
        Self::from_digest(hasher.finalize().as_bytes())
    }

    fn from_digest(digest: &[u8; 32]) -> Self {
        Self(format!("tz1{}", hex::encode(&digest[..16])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for log lines (prefix plus first 8 characters).
    pub fn short(&self) -> String {
        self.0.chars().take(11).collect()
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a registered artwork.
///
/// Any string is a valid identifier; registration is what gives it meaning.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtworkId(String);

impl ArtworkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArtworkId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ArtworkId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for ArtworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArtworkId({:?})", self.0)
    }
}

impl fmt::Display for ArtworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
