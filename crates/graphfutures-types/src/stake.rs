//! Collateral tracking types for the GraphFutures escrow model.
//!
//! Every indexer has a `total_staked` balance and a `locked` portion
//! committed to open futures. Amounts are integer base units.

use serde::{Deserialize, Serialize};

/// Per-indexer collateral record.
///
/// Invariant: `locked <= total_staked` at every observable point between
/// operations. The collateral ledger is the only writer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StakeRecord {
    /// Collateral held, in base units.
    pub total_staked: u128,
    /// Portion of `total_staked` committed to open futures.
    pub locked: u128,
}

impl StakeRecord {
    /// Create a zero record.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total_staked: 0,
            locked: 0,
        }
    }

    /// Unlocked collateral available for new futures.
    #[must_use]
    pub fn free(&self) -> u128 {
        self.total_staked - self.locked
    }

    /// Whether this record holds no collateral at all.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total_staked == 0 && self.locked == 0
    }

    /// Whether the solvency invariant holds.
    #[must_use]
    pub fn is_solvent(&self) -> bool {
        self.locked <= self.total_staked
    }
}

impl Default for StakeRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        let record = StakeRecord::default();
        assert_eq!(record.total_staked, 0);
        assert_eq!(record.locked, 0);
        assert!(record.is_zero());
        assert!(record.is_solvent());
    }

    #[test]
    fn free_is_total_minus_locked() {
        let record = StakeRecord {
            total_staked: 1000,
            locked: 300,
        };
        assert_eq!(record.free(), 700);
        assert!(!record.is_zero());
        assert!(record.is_solvent());
    }

    #[test]
    fn fully_locked_record_has_no_free() {
        let record = StakeRecord {
            total_staked: 500,
            locked: 500,
        };
        assert_eq!(record.free(), 0);
        assert!(record.is_solvent());
    }

    #[test]
    fn serde_roundtrip() {
        let record = StakeRecord {
            total_staked: u128::MAX,
            locked: 42,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: StakeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
