//! # Future — the time-bound collateral commitment
//!
//! A `Future` locks indexer collateral against a buyer until maturity, at
//! which point an external compliance verdict decides the payout direction.
//!
//! ## State Machine
//!
//! ```text
//!   ┌────────┐  settlement   ┌─────────┐
//!   │ ACTIVE ├──────────────▶│ SETTLED │
//!   └───┬────┘               └─────────┘
//!       │ cancel
//!       ▼
//!   ┌───────────┐
//!   │ CANCELLED │
//!   └───────────┘
//! ```
//!
//! Transitions are **monotonic**: terminal states are immutable, and the
//! record is retained after termination so stale cancel/settle calls are
//! rejected distinctly instead of replayed against a freed slot.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Account, EngineError, Result};

/// The lifecycle state of a future.
///
/// Transitions never go backwards:
/// - `Active → Settled` (maturity reached, compliance verdict applied)
/// - `Active → Cancelled` (a party withdrew before settlement)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FutureStatus {
    /// Collateral is locked. The future can be cancelled or settled.
    Active,
    /// A party cancelled; collateral was returned to the indexer.
    Cancelled,
    /// Settlement resolved the future. **Irreversible.** This is what
    /// prevents double payout.
    Settled,
}

impl FutureStatus {
    /// Can this future transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::Cancelled | Self::Settled)
        )
    }

    /// Whether this is a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for FutureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Settled => write!(f, "SETTLED"),
        }
    }
}

// ---------------------------------------------------------------------------
// PairKey — canonical unordered (indexer, buyer) key
// ---------------------------------------------------------------------------

/// Canonical key for the unordered `{indexer, buyer}` pair.
///
/// At most one Active future exists per pair; the registry indexes futures
/// by this key regardless of which party posted collateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PairKey {
    lo: Account,
    hi: Account,
}

impl PairKey {
    /// Build the canonical key for two accounts, in either order.
    #[must_use]
    pub fn new(a: Account, b: Account) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Whether the given account is a member of this pair.
    #[must_use]
    pub fn contains(&self, account: Account) -> bool {
        self.lo == account || self.hi == account
    }
}

// ---------------------------------------------------------------------------
// Future
// ---------------------------------------------------------------------------

/// A futures contract between an indexer and a buyer.
///
/// While `status == Active`, `amount` base units of the indexer's collateral
/// are locked in the ledger. The sum of `amount` over an indexer's Active
/// futures equals that indexer's `locked` balance exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Future {
    /// The collateral-posting service party.
    pub indexer: Account,
    /// The counterparty compensated if the indexer is non-compliant.
    pub buyer: Account,
    /// Collateral locked and principal at stake, in base units. Positive.
    pub amount: u128,
    /// Time units before the future becomes eligible for settlement. Positive.
    pub duration: u64,
    /// Host-supplied clock value (block height or timestamp) at creation.
    pub start_time: u64,
    /// Current lifecycle state.
    pub status: FutureStatus,
}

impl Future {
    /// Open a new Active future.
    #[must_use]
    pub fn open(indexer: Account, buyer: Account, amount: u128, duration: u64, now: u64) -> Self {
        Self {
            indexer,
            buyer,
            amount,
            duration,
            start_time: now,
            status: FutureStatus::Active,
        }
    }

    /// The canonical pair key this future occupies.
    #[must_use]
    pub fn key(&self) -> PairKey {
        PairKey::new(self.indexer, self.buyer)
    }

    /// The clock value at which settlement becomes permitted.
    #[must_use]
    pub fn matures_at(&self) -> u64 {
        self.start_time.saturating_add(self.duration)
    }

    /// Whether the future has reached maturity at the given clock value.
    #[must_use]
    pub fn is_mature(&self, now: u64) -> bool {
        now >= self.matures_at()
    }

    /// Whether the given account is a party to this future.
    #[must_use]
    pub fn involves(&self, account: Account) -> bool {
        self.indexer == account || self.buyer == account
    }

    /// Attempt to transition to CANCELLED.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidTransition`] if the future is not Active.
    pub fn mark_cancelled(&mut self) -> Result<()> {
        if !self.status.can_transition_to(FutureStatus::Cancelled) {
            return Err(EngineError::InvalidTransition {
                from: self.status,
                to: FutureStatus::Cancelled,
            });
        }
        self.status = FutureStatus::Cancelled;
        Ok(())
    }

    /// Attempt to transition to SETTLED.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidTransition`] if the future is not Active.
    pub fn mark_settled(&mut self) -> Result<()> {
        if !self.status.can_transition_to(FutureStatus::Settled) {
            return Err(EngineError::InvalidTransition {
                from: self.status,
                to: FutureStatus::Settled,
            });
        }
        self.status = FutureStatus::Settled;
        Ok(())
    }
}
