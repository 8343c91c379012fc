//! Configuration types for the GraphFutures engine.

use serde::{Deserialize, Serialize};

/// Caps applied by the future-policy gate before any mutation.
///
/// All limits are optional; `None` means unlimited. The core positivity
/// requirements (`amount > 0`, `duration > 0`) are always enforced
/// regardless of policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Maximum collateral a single future may lock, in base units.
    pub max_future_amount: Option<u128>,
    /// Maximum future duration, in host clock units.
    pub max_future_duration: Option<u64>,
    /// Maximum simultaneous Active futures per indexer.
    pub max_active_futures_per_indexer: Option<usize>,
}

impl PolicyConfig {
    /// Unlimited policy.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_future_amount: None,
            max_future_duration: None,
            max_active_futures_per_indexer: None,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}
