//! Execution mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which environment the process runs in.
///
/// Development and test modes skip live balance checks entirely; the mode is
/// threaded explicitly into every eligibility decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionMode {
    #[default]
    #[serde(rename = "PROD")]
    Production,
    #[serde(rename = "DEV")]
    Development,
    #[serde(rename = "TEST")]
    Test,
}

impl ExecutionMode {
    pub fn bypasses_balance_checks(&self) -> bool {
        matches!(self, Self::Development | Self::Test)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "PROD",
            Self::Development => "DEV",
            Self::Test => "TEST",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PROD" | "PRODUCTION" => Ok(Self::Production),
            "DEV" | "DEVELOPMENT" => Ok(Self::Development),
            "TEST" => Ok(Self::Test),
            other => Err(format!("unknown execution mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_production_checks_balances() {
        assert!(!ExecutionMode::Production.bypasses_balance_checks());
        assert!(ExecutionMode::Development.bypasses_balance_checks());
        assert!(ExecutionMode::Test.bypasses_balance_checks());
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("dev".parse::<ExecutionMode>(), Ok(ExecutionMode::Development));
        assert_eq!("PROD".parse::<ExecutionMode>(), Ok(ExecutionMode::Production));
        assert!("staging".parse::<ExecutionMode>().is_err());
    }
}
