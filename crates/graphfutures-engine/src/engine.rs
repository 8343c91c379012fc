//! The settlement engine — public operation surface and authorization.
//!
//! Exposes exactly four mutating operations (`stake`, `create_future`,
//! `cancel_future`, `settle_future`) and two read queries (`consensus_poi`,
//! `is_indexer_compliant`). Each mutation runs as a single atomic unit:
//! every check (authorization, policy, parameters, balances, maturity) runs
//! before the first write, so a rejected call has zero side effects.
//!
//! The host execution environment guarantees serialized, run-to-completion
//! execution of mutations; the engine holds no locks and reads no wall-clock
//! time — `now` is supplied by the caller as a monotonic block height or
//! timestamp.

use graphfutures_ledger::{CollateralConservation, CollateralLedger};
use graphfutures_oracle::ComplianceOracle;
use graphfutures_types::{
    Account, ConsensusPoi, EngineError, EngineEvent, Future, Result, StakeRecord, SubgraphId,
};

use crate::audit::AuditLog;
use crate::policy::FuturePolicy;
use crate::registry::FutureRegistry;

/// Orchestrates the collateral ledger, future registry, and compliance gate.
///
/// Generic over the oracle so the engine tests against a deterministic fake
/// without a live attestation network.
pub struct SettlementEngine<O: ComplianceOracle> {
    ledger: CollateralLedger,
    registry: FutureRegistry,
    oracle: O,
    policy: FuturePolicy,
    conservation: CollateralConservation,
    audit: AuditLog,
}

impl<O: ComplianceOracle> SettlementEngine<O> {
    /// Create an engine with the default (unlimited) policy.
    #[must_use]
    pub fn new(oracle: O) -> Self {
        Self::with_policy(oracle, FuturePolicy::default())
    }

    /// Create an engine with an explicit policy.
    #[must_use]
    pub fn with_policy(oracle: O, policy: FuturePolicy) -> Self {
        Self {
            ledger: CollateralLedger::new(),
            registry: FutureRegistry::new(),
            oracle,
            policy,
            conservation: CollateralConservation::new(),
            audit: AuditLog::new(),
        }
    }

    // =====================================================================
    // Mutating operations
    // =====================================================================

    /// Deposit collateral for the calling indexer.
    ///
    /// # Errors
    /// - [`EngineError::InvalidAmount`] if `amount` is zero
    /// - [`EngineError::BalanceOverflow`] if total deposits would overflow
    pub fn stake(&mut self, caller: Account, amount: u128) -> Result<EngineEvent> {
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        // Global headroom first: if the deposit total fits, no single
        // account's balance can overflow below.
        self.conservation.record_deposit(amount)?;
        self.ledger.deposit(caller, amount)?;

        let event = EngineEvent::IndexerStaked {
            indexer: caller,
            amount,
        };
        self.audit.append(event.clone());
        tracing::info!(indexer = %caller, amount = %amount, "Indexer staked");
        Ok(event)
    }

    /// Open a future between the calling indexer and `buyer`, locking
    /// `amount` of the caller's unlocked collateral for `duration` clock
    /// units starting at `now`.
    ///
    /// # Errors
    /// - [`EngineError::InvalidParameters`] for zero amount/duration or a
    ///   violated policy cap
    /// - [`EngineError::SelfDealingNotAllowed`] if `buyer == caller`
    /// - [`EngineError::FutureAlreadyExists`] if the pair already has an
    ///   Active future
    /// - [`EngineError::InsufficientUnstakedBalance`] if the unlocked stake
    ///   cannot cover `amount`
    pub fn create_future(
        &mut self,
        caller: Account,
        buyer: Account,
        amount: u128,
        duration: u64,
        now: u64,
    ) -> Result<EngineEvent> {
        self.policy
            .validate_create(amount, duration, self.registry.active_count_for(caller))?;
        self.registry
            .open(&mut self.ledger, caller, buyer, amount, duration, now)?;

        let event = EngineEvent::FutureCreated {
            indexer: caller,
            buyer,
            amount,
            duration,
        };
        self.audit.append(event.clone());
        tracing::info!(
            indexer = %caller,
            buyer = %buyer,
            amount = %amount,
            duration,
            now,
            "Future created"
        );
        Ok(event)
    }

    /// Cancel the Active future between `indexer` and `buyer`, returning its
    /// collateral to the indexer's unlocked stake. Costless at any point
    /// while Active.
    ///
    /// # Errors
    /// - [`EngineError::Unauthorized`] if `caller` is neither party
    /// - [`EngineError::FutureNotFound`] / [`EngineError::AlreadySettled`]
    ///   for missing or terminal futures
    pub fn cancel_future(
        &mut self,
        caller: Account,
        indexer: Account,
        buyer: Account,
    ) -> Result<EngineEvent> {
        Self::authorize_party(caller, indexer, buyer)?;
        let amount = self.registry.cancel(&mut self.ledger, indexer, buyer)?;

        let event = EngineEvent::FutureCancelled {
            indexer,
            buyer,
            amount,
        };
        self.audit.append(event.clone());
        tracing::info!(
            indexer = %indexer,
            buyer = %buyer,
            amount = %amount,
            caller = %caller,
            "Future cancelled"
        );
        Ok(event)
    }

    /// Settle the matured future between `indexer` and `buyer`. The
    /// compliance gate decides the payout direction: compliant indexers get
    /// their collateral back, non-compliant indexers forfeit it to the buyer.
    ///
    /// # Errors
    /// - [`EngineError::Unauthorized`] if `caller` is neither party
    /// - [`EngineError::NotYetMature`] before `start_time + duration`
    /// - [`EngineError::FutureNotFound`] / [`EngineError::AlreadySettled`]
    ///   for missing or terminal futures
    pub fn settle_future(
        &mut self,
        caller: Account,
        indexer: Account,
        buyer: Account,
        now: u64,
    ) -> Result<EngineEvent> {
        Self::authorize_party(caller, indexer, buyer)?;
        let (amount, outcome) =
            self.registry
                .settle(&mut self.ledger, &self.oracle, indexer, buyer, now)?;

        let event = EngineEvent::FutureSettled {
            indexer,
            buyer,
            amount,
            outcome,
        };
        self.audit.append(event.clone());
        tracing::info!(
            indexer = %indexer,
            buyer = %buyer,
            amount = %amount,
            outcome = %outcome,
            caller = %caller,
            "Future settled"
        );
        Ok(event)
    }

    fn authorize_party(caller: Account, indexer: Account, buyer: Account) -> Result<()> {
        if caller != indexer && caller != buyer {
            return Err(EngineError::Unauthorized {
                reason: format!("{caller} is not a party to ({indexer}, {buyer})"),
            });
        }
        Ok(())
    }

    // =====================================================================
    // Read queries — reflect only fully-committed state
    // =====================================================================

    /// The consensus proof-of-indexing for `(subgraph, block)`.
    ///
    /// # Errors
    /// Returns [`EngineError::NoConsensusAvailable`] when no attestations
    /// have been recorded for the queried point.
    pub fn consensus_poi(&self, subgraph: SubgraphId, block: u64) -> Result<ConsensusPoi> {
        self.oracle.consensus_poi(subgraph, block)
    }

    /// The current compliance verdict for an indexer. Read fresh from the
    /// gate; never cached.
    #[must_use]
    pub fn is_indexer_compliant(&self, indexer: Account) -> bool {
        self.oracle.is_compliant(indexer)
    }

    /// The stake record for an account (zero record if never seen).
    #[must_use]
    pub fn stake_of(&self, account: Account) -> StakeRecord {
        self.ledger.stake_of(account)
    }

    /// The latest future record for a pair, Active or terminal.
    #[must_use]
    pub fn future(&self, indexer: Account, buyer: Account) -> Option<&Future> {
        self.registry.future(indexer, buyer)
    }

    /// The append-only audit trail.
    #[must_use]
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// The injected oracle.
    #[must_use]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Mutable access to the injected oracle, for the host-side feed.
    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    // =====================================================================
    // Invariant verification
    // =====================================================================

    /// Verify solvency, lock accounting, and collateral conservation across
    /// the whole engine.
    ///
    /// # Errors
    /// Returns [`EngineError::InvariantViolation`] naming the broken
    /// invariant.
    pub fn verify_invariants(&self) -> Result<()> {
        for (account, record) in self.ledger.entries() {
            if !record.is_solvent() {
                return Err(EngineError::InvariantViolation {
                    reason: format!(
                        "solvency broken for {account}: locked {} > total_staked {}",
                        record.locked, record.total_staked
                    ),
                });
            }
            let committed = self.registry.locked_for(*account);
            if committed != record.locked {
                return Err(EngineError::InvariantViolation {
                    reason: format!(
                        "lock accounting broken for {account}: ledger locked {} != \
                         active futures total {committed}",
                        record.locked
                    ),
                });
            }
        }
        self.conservation.verify(self.ledger.total_collateral())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphfutures_oracle::InMemoryOracle;
    use graphfutures_types::{FutureStatus, SettlementOutcome};

    fn account(tag: u8) -> Account {
        Account::from_bytes([tag; 20])
    }

    fn engine() -> SettlementEngine<InMemoryOracle> {
        SettlementEngine::new(InMemoryOracle::new())
    }

    #[test]
    fn stake_emits_event_and_updates_balance() {
        let mut engine = engine();
        let indexer = account(1);
        let event = engine.stake(indexer, 1000).unwrap();
        assert!(matches!(
            event,
            EngineEvent::IndexerStaked { amount: 1000, .. }
        ));
        assert_eq!(engine.stake_of(indexer).total_staked, 1000);
        assert_eq!(engine.audit().len(), 1);
        engine.verify_invariants().unwrap();
    }

    #[test]
    fn zero_stake_rejected_without_receipt() {
        let mut engine = engine();
        let err = engine.stake(account(1), 0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount));
        assert!(engine.audit().is_empty());
    }

    #[test]
    fn create_cancel_settle_round_trip() {
        let mut engine = engine();
        let indexer = account(1);
        let buyer = account(2);
        engine.stake(indexer, 1000).unwrap();
        engine.create_future(indexer, buyer, 300, 10, 100).unwrap();
        assert_eq!(engine.stake_of(indexer).locked, 300);

        engine.cancel_future(buyer, indexer, buyer).unwrap();
        assert_eq!(engine.stake_of(indexer).locked, 0);
        assert_eq!(
            engine.future(indexer, buyer).unwrap().status,
            FutureStatus::Cancelled
        );
        assert_eq!(engine.audit().len(), 3);
        engine.verify_invariants().unwrap();
    }

    #[test]
    fn non_party_cannot_cancel_or_settle() {
        let mut engine = engine();
        let indexer = account(1);
        let buyer = account(2);
        let stranger = account(9);
        engine.stake(indexer, 1000).unwrap();
        engine.create_future(indexer, buyer, 300, 10, 100).unwrap();

        let err = engine.cancel_future(stranger, indexer, buyer).unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized { .. }));
        let err = engine
            .settle_future(stranger, indexer, buyer, 110)
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized { .. }));

        // Rejected calls left no trace.
        assert_eq!(engine.stake_of(indexer).locked, 300);
        assert_eq!(engine.audit().len(), 2);
        engine.verify_invariants().unwrap();
    }

    #[test]
    fn either_party_may_settle() {
        let mut engine = engine();
        let indexer = account(1);
        let buyer = account(2);
        engine.oracle_mut().set_compliance(indexer, true);
        engine.stake(indexer, 1000).unwrap();
        engine.create_future(indexer, buyer, 300, 10, 100).unwrap();

        // Buyer-initiated settlement of a compliant indexer.
        let event = engine.settle_future(buyer, indexer, buyer, 110).unwrap();
        assert!(matches!(
            event,
            EngineEvent::FutureSettled {
                outcome: SettlementOutcome::CollateralReleased,
                ..
            }
        ));
        engine.verify_invariants().unwrap();
    }

    #[test]
    fn policy_cap_blocks_creation_before_any_mutation() {
        let policy = FuturePolicy::with_limits(Some(100), None, None);
        let mut engine = SettlementEngine::with_policy(InMemoryOracle::new(), policy);
        let indexer = account(1);
        engine.stake(indexer, 1000).unwrap();

        let err = engine
            .create_future(indexer, account(2), 500, 10, 100)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameters { .. }));
        assert_eq!(engine.stake_of(indexer).locked, 0);
        assert!(engine.future(indexer, account(2)).is_none());
        engine.verify_invariants().unwrap();
    }

    #[test]
    fn active_future_cap_counts_only_open_futures() {
        let policy = FuturePolicy::with_limits(None, None, Some(1));
        let mut engine = SettlementEngine::with_policy(InMemoryOracle::new(), policy);
        let indexer = account(1);
        engine.stake(indexer, 1000).unwrap();

        engine
            .create_future(indexer, account(2), 100, 10, 100)
            .unwrap();
        let err = engine
            .create_future(indexer, account(3), 100, 10, 100)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameters { .. }));

        // Cancelling frees the slot.
        engine.cancel_future(indexer, indexer, account(2)).unwrap();
        engine
            .create_future(indexer, account(3), 100, 10, 100)
            .unwrap();
        engine.verify_invariants().unwrap();
    }

    #[test]
    fn read_queries_delegate_to_oracle() {
        let mut engine = engine();
        let subgraph = SubgraphId::from_bytes([5; 32]);
        let indexer = account(1);

        let err = engine.consensus_poi(subgraph, 42).unwrap_err();
        assert!(matches!(err, EngineError::NoConsensusAvailable { .. }));
        assert!(!engine.is_indexer_compliant(indexer));

        engine
            .oracle_mut()
            .record_poi(subgraph, 42, ConsensusPoi::new([7; 32], 9000));
        engine.oracle_mut().set_compliance(indexer, true);

        let poi = engine.consensus_poi(subgraph, 42).unwrap();
        assert_eq!(poi.attesting_stake, 9000);
        assert!(engine.is_indexer_compliant(indexer));
    }

    #[test]
    fn forfeiture_keeps_conservation() {
        let mut engine = engine();
        let indexer = account(1);
        let buyer = account(2);
        engine.stake(indexer, 1000).unwrap();
        engine.create_future(indexer, buyer, 300, 10, 100).unwrap();

        // No verdict recorded: non-compliant, collateral forfeits.
        engine.settle_future(indexer, indexer, buyer, 110).unwrap();
        assert_eq!(engine.stake_of(indexer).total_staked, 700);
        assert_eq!(engine.stake_of(buyer).total_staked, 300);
        engine.verify_invariants().unwrap();
    }
}
