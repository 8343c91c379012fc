//! Collateral bookkeeping for the settlement engine.
//!
//! Tracks per-indexer stake with total/locked accounting. All mutations are
//! atomic: every check runs before the first write, so a failed operation
//! leaves the ledger unchanged.

use std::collections::HashMap;

use graphfutures_types::{Account, EngineError, Result, StakeRecord};

/// Manages indexer collateral with total/locked accounting.
///
/// The ledger is the source of truth for all balance state. The future
/// registry calls into it to lock collateral when opening a future and to
/// unlock or transfer it at resolution.
pub struct CollateralLedger {
    /// Per-indexer stake records.
    stakes: HashMap<Account, StakeRecord>,
}

impl CollateralLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stakes: HashMap::new(),
        }
    }

    /// Deposit collateral (increases `total_staked`, `locked` untouched).
    ///
    /// # Errors
    /// - [`EngineError::InvalidAmount`] if `amount` is zero
    /// - [`EngineError::BalanceOverflow`] if the deposit would overflow
    pub fn deposit(&mut self, account: Account, amount: u128) -> Result<()> {
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        let current = self.stakes.get(&account).copied().unwrap_or_default();
        let new_total = current
            .total_staked
            .checked_add(amount)
            .ok_or(EngineError::BalanceOverflow)?;

        self.stakes.entry(account).or_default().total_staked = new_total;
        tracing::debug!(account = %account, amount = %amount, "Collateral deposited");
        Ok(())
    }

    /// Lock unlocked collateral against a future.
    ///
    /// # Errors
    /// Returns [`EngineError::InsufficientUnstakedBalance`] if the unlocked
    /// portion is smaller than `amount`.
    pub fn lock(&mut self, account: Account, amount: u128) -> Result<()> {
        let entry = self.stakes.get_mut(&account).ok_or(
            EngineError::InsufficientUnstakedBalance {
                needed: amount,
                free: 0,
            },
        )?;

        if entry.free() < amount {
            return Err(EngineError::InsufficientUnstakedBalance {
                needed: amount,
                free: entry.free(),
            });
        }

        entry.locked += amount;
        tracing::debug!(account = %account, amount = %amount, "Collateral locked");
        Ok(())
    }

    /// Unlock previously locked collateral back to the unlocked portion.
    ///
    /// Callers resolve futures against their recorded amounts, so a failure
    /// here means the lock accounting has diverged.
    ///
    /// # Errors
    /// Returns [`EngineError::InvariantViolation`] if `locked < amount`.
    pub fn unlock(&mut self, account: Account, amount: u128) -> Result<()> {
        let entry =
            self.stakes
                .get_mut(&account)
                .ok_or_else(|| EngineError::InvariantViolation {
                    reason: format!("unlock of {amount} for unknown account {account}"),
                })?;

        if entry.locked < amount {
            return Err(EngineError::InvariantViolation {
                reason: format!(
                    "unlock of {amount} exceeds locked balance {} for {account}",
                    entry.locked
                ),
            });
        }

        entry.locked -= amount;
        tracing::debug!(account = %account, amount = %amount, "Collateral unlocked");
        Ok(())
    }

    /// Pay locked collateral out to another account at settlement.
    ///
    /// Atomically decreases `from`'s `total_staked` and `locked` and
    /// increases `to`'s `total_staked`. Total collateral across the ledger
    /// is unchanged.
    ///
    /// # Errors
    /// - [`EngineError::InvariantViolation`] if `from` has less than
    ///   `amount` locked (or `from == to`)
    /// - [`EngineError::BalanceOverflow`] if `to`'s balance would overflow
    pub fn transfer_locked(&mut self, from: Account, to: Account, amount: u128) -> Result<()> {
        if from == to {
            return Err(EngineError::InvariantViolation {
                reason: format!("locked transfer from {from} to itself"),
            });
        }

        let source = self.stakes.get(&from).copied().unwrap_or_default();
        if source.locked < amount || source.total_staked < amount {
            return Err(EngineError::InvariantViolation {
                reason: format!(
                    "locked transfer of {amount} exceeds holdings of {from} \
                     (total_staked={}, locked={})",
                    source.total_staked, source.locked
                ),
            });
        }

        let target_total = self.stakes.get(&to).copied().unwrap_or_default().total_staked;
        let new_target_total = target_total
            .checked_add(amount)
            .ok_or(EngineError::BalanceOverflow)?;

        // All checks passed; the two writes below cannot fail.
        {
            let entry = self.stakes.get_mut(&from).expect("source checked above");
            entry.total_staked -= amount;
            entry.locked -= amount;
        }
        self.stakes.entry(to).or_default().total_staked = new_target_total;

        tracing::debug!(
            from = %from,
            to = %to,
            amount = %amount,
            "Locked collateral transferred"
        );
        Ok(())
    }

    /// The stake record for an account (zero record if never seen).
    #[must_use]
    pub fn stake_of(&self, account: Account) -> StakeRecord {
        self.stakes.get(&account).copied().unwrap_or_default()
    }

    /// Total collateral across all accounts.
    #[must_use]
    pub fn total_collateral(&self) -> u128 {
        self.stakes.values().map(|record| record.total_staked).sum()
    }

    /// Iterate over all `(account, record)` entries.
    pub fn entries(&self) -> impl Iterator<Item = (&Account, &StakeRecord)> {
        self.stakes.iter()
    }
}

impl Default for CollateralLedger {
    fn default() -> Self {
        Self::new()
    }
}
