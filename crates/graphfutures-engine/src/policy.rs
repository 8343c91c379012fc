//! Future policy — hard gate for creation parameters.
//!
//! The policy validates every `create_future` call before any mutation.
//! Fail-closed: if a cap is configured and exceeded, the future is rejected.
//! All caps are optional; the default policy only enforces what the core
//! semantics already require.

use graphfutures_types::{EngineError, PolicyConfig, Result};

/// Optional caps applied before opening a future.
pub struct FuturePolicy {
    /// Maximum collateral a single future may lock.
    max_amount: Option<u128>,
    /// Maximum future duration, in host clock units.
    max_duration: Option<u64>,
    /// Maximum simultaneous Active futures per indexer.
    max_active_per_indexer: Option<usize>,
}

impl FuturePolicy {
    /// Policy with no caps.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&PolicyConfig::unlimited())
    }

    /// Policy from configuration.
    #[must_use]
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self {
            max_amount: config.max_future_amount,
            max_duration: config.max_future_duration,
            max_active_per_indexer: config.max_active_futures_per_indexer,
        }
    }

    /// Policy with explicit caps.
    #[must_use]
    pub fn with_limits(
        max_amount: Option<u128>,
        max_duration: Option<u64>,
        max_active_per_indexer: Option<usize>,
    ) -> Self {
        Self {
            max_amount,
            max_duration,
            max_active_per_indexer,
        }
    }

    /// Validate creation parameters against the configured caps.
    ///
    /// `active_for_indexer` is the indexer's current count of Active futures.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidParameters`] naming the violated cap.
    pub fn validate_create(
        &self,
        amount: u128,
        duration: u64,
        active_for_indexer: usize,
    ) -> Result<()> {
        if let Some(max) = self.max_amount {
            if amount > max {
                return Err(EngineError::InvalidParameters {
                    reason: format!("amount {amount} exceeds policy cap {max}"),
                });
            }
        }
        if let Some(max) = self.max_duration {
            if duration > max {
                return Err(EngineError::InvalidParameters {
                    reason: format!("duration {duration} exceeds policy cap {max}"),
                });
            }
        }
        if let Some(max) = self.max_active_per_indexer {
            if active_for_indexer >= max {
                return Err(EngineError::InvalidParameters {
                    reason: format!("indexer already holds {active_for_indexer} active futures (cap {max})"),
                });
            }
        }
        Ok(())
    }
}

impl Default for FuturePolicy {
    fn default() -> Self {
        Self::new()
    }
}
