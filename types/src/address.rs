//! Flow account address type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// A Flow account address: `0x` followed by up to 16 hex digits.
///
/// Stored in canonical form (lower case, zero-padded to 16 digits) so that
/// two spellings of the same account compare equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// The prefix every address carries.
    pub const PREFIX: &'static str = "0x";

    /// Number of hex digits in a canonical address (8 bytes).
    pub const HEX_LEN: usize = 16;

    /// Parse and canonicalise an address.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let digits = raw
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| TypesError::InvalidAddress(raw.to_string()))?;
        if digits.is_empty() || digits.len() > Self::HEX_LEN {
            return Err(TypesError::InvalidAddress(raw.to_string()));
        }
        let padded = format!("{:0>width$}", digits.to_ascii_lowercase(), width = Self::HEX_LEN);
        hex::decode(&padded).map_err(|_| TypesError::InvalidAddress(raw.to_string()))?;
        Ok(Self(format!("{}{}", Self::PREFIX, padded)))
    }

    /// Return the canonical address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 8 raw address bytes.
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        // Canonical form is always 16 valid hex digits.
        if let Ok(bytes) = hex::decode(&self.0[Self::PREFIX.len()..]) {
            out.copy_from_slice(&bytes);
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
