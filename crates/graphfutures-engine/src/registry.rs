//! Future registry — owns the futures and their lifecycle.
//!
//! The registry enforces the one-active-future-per-pair invariant and keeps
//! the ledger's lock accounting exact: collateral is locked when a future
//! opens and released (or paid out) exactly once when it terminates.
//!
//! Terminal records are retained: the latest record for a pair stays in the
//! registry until a new future supersedes it, at which point it moves to the
//! archive. Stale cancel/settle calls therefore fail distinctly instead of
//! replaying against a freed slot.

use std::collections::HashMap;

use graphfutures_ledger::CollateralLedger;
use graphfutures_oracle::ComplianceOracle;
use graphfutures_types::{
    Account, EngineError, Future, FutureStatus, PairKey, Result, SettlementOutcome,
};

/// Owns the set of futures contracts, keyed by the unordered account pair.
pub struct FutureRegistry {
    /// Latest future per pair (Active or terminal).
    futures: HashMap<PairKey, Future>,
    /// Terminal records superseded by a newer future for the same pair.
    archive: Vec<Future>,
}

impl FutureRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            futures: HashMap::new(),
            archive: Vec::new(),
        }
    }

    /// Open a new future, locking `amount` of the indexer's collateral.
    ///
    /// The ledger lock is the only fallible mutation and runs after every
    /// validation, so a rejected call leaves both registry and ledger
    /// untouched.
    ///
    /// # Errors
    /// - [`EngineError::SelfDealingNotAllowed`] if `indexer == buyer`
    /// - [`EngineError::InvalidParameters`] if `amount` or `duration` is zero
    /// - [`EngineError::FutureAlreadyExists`] if the pair has an Active future
    /// - [`EngineError::InsufficientUnstakedBalance`] propagated from the lock
    pub fn open(
        &mut self,
        ledger: &mut CollateralLedger,
        indexer: Account,
        buyer: Account,
        amount: u128,
        duration: u64,
        now: u64,
    ) -> Result<()> {
        if indexer == buyer {
            return Err(EngineError::SelfDealingNotAllowed);
        }
        if amount == 0 {
            return Err(EngineError::InvalidParameters {
                reason: "amount must be positive".to_string(),
            });
        }
        if duration == 0 {
            return Err(EngineError::InvalidParameters {
                reason: "duration must be positive".to_string(),
            });
        }

        let key = PairKey::new(indexer, buyer);
        if self
            .futures
            .get(&key)
            .is_some_and(|f| f.status == FutureStatus::Active)
        {
            return Err(EngineError::FutureAlreadyExists { indexer, buyer });
        }

        ledger.lock(indexer, amount)?;

        let future = Future::open(indexer, buyer, amount, duration, now);
        if let Some(superseded) = self.futures.insert(key, future) {
            self.archive.push(superseded);
        }
        Ok(())
    }

    /// Cancel the pair's Active future, unlocking its collateral back to the
    /// indexer. Returns the unlocked amount.
    ///
    /// # Errors
    /// - [`EngineError::FutureNotFound`] if the pair has no Active future
    ///   (including a previously cancelled one)
    /// - [`EngineError::AlreadySettled`] if the pair's future was settled
    pub fn cancel(
        &mut self,
        ledger: &mut CollateralLedger,
        indexer: Account,
        buyer: Account,
    ) -> Result<u128> {
        let future = Self::active_mut(&mut self.futures, indexer, buyer)?;
        let amount = future.amount;

        ledger.unlock(indexer, amount)?;
        future.mark_cancelled()?;
        Ok(amount)
    }

    /// Settle the pair's matured future, querying the compliance gate for
    /// the payout direction. Returns the amount and the outcome.
    ///
    /// The verdict is read fresh from the gate on every call — compliance
    /// may have changed since creation.
    ///
    /// # Errors
    /// - [`EngineError::FutureNotFound`] / [`EngineError::AlreadySettled`]
    ///   as for [`cancel`](Self::cancel)
    /// - [`EngineError::NotYetMature`] if `now < start_time + duration`
    pub fn settle(
        &mut self,
        ledger: &mut CollateralLedger,
        oracle: &impl ComplianceOracle,
        indexer: Account,
        buyer: Account,
        now: u64,
    ) -> Result<(u128, SettlementOutcome)> {
        let future = Self::active_mut(&mut self.futures, indexer, buyer)?;
        if !future.is_mature(now) {
            return Err(EngineError::NotYetMature {
                now,
                matures_at: future.matures_at(),
            });
        }
        let amount = future.amount;

        let outcome = if oracle.is_compliant(indexer) {
            ledger.unlock(indexer, amount)?;
            SettlementOutcome::CollateralReleased
        } else {
            ledger.transfer_locked(indexer, buyer, amount)?;
            SettlementOutcome::CollateralForfeited
        };

        future.mark_settled()?;
        Ok((amount, outcome))
    }

    /// Resolve the pair's Active future, with the named indexer as the
    /// collateral-posting party. Swapped roles resolve the same slot but do
    /// not match a real commitment, so they report `FutureNotFound` rather
    /// than inverting the payout direction.
    fn active_mut<'a>(
        futures: &'a mut HashMap<PairKey, Future>,
        indexer: Account,
        buyer: Account,
    ) -> Result<&'a mut Future> {
        let key = PairKey::new(indexer, buyer);
        match futures.get_mut(&key) {
            Some(future) if future.indexer == indexer && future.buyer == buyer => {
                match future.status {
                    FutureStatus::Active => Ok(future),
                    FutureStatus::Cancelled => Err(EngineError::FutureNotFound { indexer, buyer }),
                    FutureStatus::Settled => Err(EngineError::AlreadySettled { indexer, buyer }),
                }
            }
            _ => Err(EngineError::FutureNotFound { indexer, buyer }),
        }
    }

    /// The latest record for a pair, Active or terminal.
    #[must_use]
    pub fn future(&self, indexer: Account, buyer: Account) -> Option<&Future> {
        self.futures.get(&PairKey::new(indexer, buyer))
    }

    /// The pair's future if it is currently Active.
    #[must_use]
    pub fn active_future(&self, indexer: Account, buyer: Account) -> Option<&Future> {
        self.future(indexer, buyer)
            .filter(|f| f.status == FutureStatus::Active && f.indexer == indexer && f.buyer == buyer)
    }

    /// Sum of collateral committed by this indexer across Active futures.
    /// Equals the indexer's `locked` ledger balance exactly.
    #[must_use]
    pub fn locked_for(&self, indexer: Account) -> u128 {
        self.futures
            .values()
            .filter(|f| f.status == FutureStatus::Active && f.indexer == indexer)
            .map(|f| f.amount)
            .sum()
    }

    /// Number of Active futures where this account posts the collateral.
    #[must_use]
    pub fn active_count_for(&self, indexer: Account) -> usize {
        self.futures
            .values()
            .filter(|f| f.status == FutureStatus::Active && f.indexer == indexer)
            .count()
    }

    /// Total number of Active futures.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.futures
            .values()
            .filter(|f| f.status == FutureStatus::Active)
            .count()
    }

    /// Terminal records superseded by a newer future for the same pair.
    #[must_use]
    pub fn archived(&self) -> &[Future] {
        &self.archive
    }
}

impl Default for FutureRegistry {
    fn default() -> Self {
        Self::new()
    }
}
