use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const MUTEZ_PER_TEZ: u64 = 1_000_000;

/// Amount in mutez, the minor currency unit (one millionth of a tez).
///
/// Amounts are unsigned, so a "negative" payment cannot be expressed; a
/// zero amount is representable and is rejected by the payment processor.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Mutez(u64);

impl Mutez {
    pub const ZERO: Self = Self(0);

    pub const fn new(mutez: u64) -> Self {
        Self(mutez)
    }

    /// Whole tez, saturating at the maximum representable amount.
    pub const fn from_tez(tez: u64) -> Self {
        Self(tez.saturating_mul(MUTEZ_PER_TEZ))
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl FromStr for Mutez {
    type Err = TypeError;

    /// Parses a plain mutez integer (`"1500000"`) or a tez amount with a
    /// `tez` suffix (`"1.5tez"`). Only ASCII digits and one decimal point
    /// are accepted; signs are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |reason: &str| TypeError::InvalidAmount(format!("{s:?}: {reason}"));

        let Some(tez) = s.strip_suffix("tez") else {
            return digits(s).map(Self).ok_or_else(|| invalid("not a whole number of mutez"));
        };

        let tez = tez.trim();
        let (whole, frac) = tez.split_once('.').unwrap_or((tez, ""));
        if frac.len() > 6 {
            return Err(invalid("more than 6 decimal places"));
        }
        let whole = digits(whole).ok_or_else(|| invalid("malformed whole tez"))?;
        let frac = if frac.is_empty() {
            0
        } else {
            digits(&format!("{frac:0<6}")).ok_or_else(|| invalid("malformed fraction"))?
        };
        whole
            .checked_mul(MUTEZ_PER_TEZ)
            .and_then(|m| m.checked_add(frac))
            .map(Self)
            .ok_or_else(|| invalid("overflow"))
    }
}

/// Unsigned decimal made of ASCII digits only.
fn digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl Sum for Mutez {
    /// Saturating sum; totals in this system stay far below `u64::MAX`.
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.fold(0u64, |acc, m| acc.saturating_add(m.0)))
    }
}

impl From<u64> for Mutez {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Mutez {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mutez({})", self.0)
    }
}

impl fmt::Display for Mutez {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:06} tez",
            self.0 / MUTEZ_PER_TEZ,
            self.0 % MUTEZ_PER_TEZ
        )
    }
}
