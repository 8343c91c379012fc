//! Events emitted by the settlement engine.
//!
//! Every successful mutating operation produces exactly one [`EngineEvent`],
//! returned to the caller and appended to the audit log.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Account;

/// Direction a matured future resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementOutcome {
    /// Indexer was compliant: collateral unlocked back to the indexer.
    CollateralReleased,
    /// Indexer was non-compliant: collateral forfeited to the buyer.
    CollateralForfeited,
}

impl fmt::Display for SettlementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollateralReleased => write!(f, "RELEASED"),
            Self::CollateralForfeited => write!(f, "FORFEITED"),
        }
    }
}

/// The event produced by a successful mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// An indexer deposited collateral.
    IndexerStaked { indexer: Account, amount: u128 },
    /// A future was opened and collateral locked.
    FutureCreated {
        indexer: Account,
        buyer: Account,
        amount: u128,
        duration: u64,
    },
    /// An active future was cancelled and collateral unlocked.
    FutureCancelled {
        indexer: Account,
        buyer: Account,
        amount: u128,
    },
    /// A matured future was settled.
    FutureSettled {
        indexer: Account,
        buyer: Account,
        amount: u128,
        outcome: SettlementOutcome,
    },
}

impl EngineEvent {
    /// Stable tag for logs and audit payloads.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IndexerStaked { .. } => "INDEXER_STAKED",
            Self::FutureCreated { .. } => "FUTURE_CREATED",
            Self::FutureCancelled { .. } => "FUTURE_CANCELLED",
            Self::FutureSettled { .. } => "FUTURE_SETTLED",
        }
    }
}

impl fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexerStaked { indexer, amount } => {
                write!(f, "INDEXER_STAKED {indexer} amount={amount}")
            }
            Self::FutureCreated {
                indexer,
                buyer,
                amount,
                duration,
            } => write!(
                f,
                "FUTURE_CREATED {indexer} -> {buyer} amount={amount} duration={duration}"
            ),
            Self::FutureCancelled {
                indexer,
                buyer,
                amount,
            } => write!(f, "FUTURE_CANCELLED {indexer} -> {buyer} amount={amount}"),
            Self::FutureSettled {
                indexer,
                buyer,
                amount,
                outcome,
            } => write!(
                f,
                "FUTURE_SETTLED {indexer} -> {buyer} amount={amount} outcome={outcome}"
            ),
        }
    }
}
