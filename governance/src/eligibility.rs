//! Balance-based vote eligibility.

use agora_types::Balance;

use crate::{ExecutionMode, GovernanceError, Strategy};

/// Outcome of a successful eligibility check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eligibility {
    /// The address may vote with this weight.
    Weighted(u64),
    /// Balance checks were skipped; no weight was computed.
    Bypassed,
}

impl Eligibility {
    pub fn weight(&self) -> Option<u64> {
        match self {
            Self::Weighted(weight) => Some(*weight),
            Self::Bypassed => None,
        }
    }
}

/// Decide whether `balance` entitles its owner to vote under `strategy`.
///
/// In a mode that bypasses balance checks this succeeds before the strategy
/// name is even looked up. Otherwise the weight must be non-zero and, when a
/// positive `min_balance` is set, at least that threshold.
pub fn validate_balance(
    strategy: &str,
    balance: &Balance,
    min_balance: Option<u64>,
    mode: ExecutionMode,
) -> Result<Eligibility, GovernanceError> {
    if mode.bypasses_balance_checks() {
        return Ok(Eligibility::Bypassed);
    }

    let parsed: Strategy = strategy.parse()?;
    let weight = parsed.weight(balance);
    let required = min_balance.filter(|min| *min > 0).unwrap_or(0);

    if weight == 0 || weight < required {
        return Err(GovernanceError::InsufficientBalance {
            strategy: strategy.to_string(),
            weight,
            required,
        });
    }
    Ok(Eligibility::Weighted(weight))
}

/// Clamp `weight` to the proposal's `max_weight` for capped strategies.
pub fn apply_weight_cap(strategy: Strategy, weight: u64, max_weight: Option<u64>) -> u64 {
    match max_weight {
        Some(cap) if strategy.is_capped() => weight.min(cap),
        _ => weight,
    }
}
