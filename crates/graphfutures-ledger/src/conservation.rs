//! Collateral conservation invariant checker.
//!
//! Mathematical invariant enforced across every settlement cycle:
//! ```text
//! Σ(total_staked over all accounts) == Σ(deposits)
//! ```
//!
//! There is no withdrawal operation in this system: `create`/`cancel` and the
//! compliant settlement branch leave totals untouched, and the forfeiture
//! branch merely reassigns collateral between two accounts. If the invariant
//! ever breaks, something has gone catastrophically wrong.

use graphfutures_types::{EngineError, Result};

/// Tracks total deposited collateral and validates conservation against the
/// ledger's actual sum.
pub struct CollateralConservation {
    /// Total deposits since genesis, in base units.
    deposited: u128,
}

impl CollateralConservation {
    /// Create a new conservation tracker.
    #[must_use]
    pub fn new() -> Self {
        Self { deposited: 0 }
    }

    /// Record a deposit.
    ///
    /// # Errors
    /// Returns [`EngineError::BalanceOverflow`] if total deposits would
    /// overflow the base-unit representation.
    pub fn record_deposit(&mut self, amount: u128) -> Result<()> {
        self.deposited = self
            .deposited
            .checked_add(amount)
            .ok_or(EngineError::BalanceOverflow)?;
        Ok(())
    }

    /// Expected total collateral: everything ever deposited.
    #[must_use]
    pub fn expected_total(&self) -> u128 {
        self.deposited
    }

    /// Verify that the actual ledger sum matches the expected total.
    ///
    /// # Errors
    /// Returns [`EngineError::InvariantViolation`] if `actual != expected`.
    pub fn verify(&self, actual: u128) -> Result<()> {
        let expected = self.expected_total();
        if actual != expected {
            return Err(EngineError::InvariantViolation {
                reason: format!(
                    "collateral not conserved: ledger holds {actual}, deposits total {expected}"
                ),
            });
        }
        Ok(())
    }
}

impl Default for CollateralConservation {
    fn default() -> Self {
        Self::new()
    }
}
