//! Error types for the GraphFutures settlement engine.
//!
//! All errors use the `GF_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Collateral ledger errors
//! - 2xx: Future lifecycle errors
//! - 3xx: Settlement errors
//! - 4xx: Oracle / consensus errors
//! - 5xx: Authorization errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Account, FutureStatus, SubgraphId};

/// Central error enum for all GraphFutures operations.
///
/// Every error is detected and rejected before any mutation is applied;
/// a failed call leaves ledger and registry state unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    // =================================================================
    // Collateral Ledger Errors (1xx)
    // =================================================================
    /// A zero or otherwise malformed amount was supplied.
    #[error("GF_ERR_100: Invalid amount: must be positive")]
    InvalidAmount,

    /// Attempted lock exceeds the unlocked portion of the stake.
    #[error("GF_ERR_101: Insufficient unstaked balance: need {needed}, have {free}")]
    InsufficientUnstakedBalance { needed: u128, free: u128 },

    /// A balance operation would overflow the base-unit representation.
    #[error("GF_ERR_102: Balance overflow")]
    BalanceOverflow,

    // =================================================================
    // Future Lifecycle Errors (2xx)
    // =================================================================
    /// Malformed creation parameters (zero amount/duration, policy caps).
    #[error("GF_ERR_200: Invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    /// Indexer and buyer are the same account.
    #[error("GF_ERR_201: Self-dealing not allowed: indexer and buyer are the same account")]
    SelfDealingNotAllowed,

    /// An Active future already occupies this pair slot.
    #[error("GF_ERR_202: Active future already exists for ({indexer}, {buyer})")]
    FutureAlreadyExists { indexer: Account, buyer: Account },

    /// No Active future exists for this pair.
    #[error("GF_ERR_203: No active future found for ({indexer}, {buyer})")]
    FutureNotFound { indexer: Account, buyer: Account },

    /// A lifecycle transition was attempted from a terminal state.
    #[error("GF_ERR_204: Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: FutureStatus, to: FutureStatus },

    // =================================================================
    // Settlement Errors (3xx)
    // =================================================================
    /// Settlement attempted before `start_time + duration`.
    #[error("GF_ERR_300: Future not yet mature: now {now}, matures at {matures_at}")]
    NotYetMature { now: u64, matures_at: u64 },

    /// The future for this pair has already been settled.
    #[error("GF_ERR_301: Future already settled for ({indexer}, {buyer})")]
    AlreadySettled { indexer: Account, buyer: Account },

    // =================================================================
    // Oracle / Consensus Errors (4xx)
    // =================================================================
    /// No consensus proof-of-indexing recorded for the queried point.
    #[error("GF_ERR_400: No consensus available for {subgraph} at block {block}")]
    NoConsensusAvailable { subgraph: SubgraphId, block: u64 },

    // =================================================================
    // Authorization Errors (5xx)
    // =================================================================
    /// Caller is not a permitted party for the requested transition.
    #[error("GF_ERR_500: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// An internal accounting invariant was violated. Never
    /// caller-triggerable by construction.
    #[error("GF_ERR_900: Invariant violation: {reason}")]
    InvariantViolation { reason: String },

    /// Serialization / deserialization error.
    #[error("GF_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, EngineError>;

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
