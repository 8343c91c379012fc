//! Host-fed in-memory oracle.
//!
//! Holds the latest externally-computed consensus POIs and compliance
//! verdicts. The host feeds it through [`record_poi`] / [`set_compliance`];
//! the engine only ever reads. Also serves as the deterministic fake for
//! engine tests.
//!
//! [`record_poi`]: InMemoryOracle::record_poi
//! [`set_compliance`]: InMemoryOracle::set_compliance

use std::collections::HashMap;

use graphfutures_types::{Account, ConsensusPoi, EngineError, Result, SubgraphId};

use crate::gate::ComplianceOracle;

/// In-memory store of oracle outputs.
///
/// Unknown indexers are non-compliant: the gate fails closed rather than
/// letting an unattested indexer settle in its own favor.
pub struct InMemoryOracle {
    /// Latest consensus POI per `(subgraph, block)`. Re-recording a point
    /// overwrites it — the newest consensus wins.
    poi_data: HashMap<(SubgraphId, u64), ConsensusPoi>,
    /// Latest compliance verdict per indexer.
    verdicts: HashMap<Account, bool>,
}

impl InMemoryOracle {
    /// Create an empty oracle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            poi_data: HashMap::new(),
            verdicts: HashMap::new(),
        }
    }

    /// Record the consensus POI for a `(subgraph, block)` point.
    pub fn record_poi(&mut self, subgraph: SubgraphId, block: u64, poi: ConsensusPoi) {
        tracing::debug!(
            subgraph = %subgraph,
            block,
            poi = %poi,
            "Consensus POI recorded"
        );
        self.poi_data.insert((subgraph, block), poi);
    }

    /// Record the compliance verdict for an indexer.
    pub fn set_compliance(&mut self, indexer: Account, compliant: bool) {
        tracing::debug!(indexer = %indexer, compliant, "Compliance verdict recorded");
        self.verdicts.insert(indexer, compliant);
    }

    /// Number of recorded consensus points.
    #[must_use]
    pub fn poi_count(&self) -> usize {
        self.poi_data.len()
    }
}

impl Default for InMemoryOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplianceOracle for InMemoryOracle {
    fn consensus_poi(&self, subgraph: SubgraphId, block: u64) -> Result<ConsensusPoi> {
        self.poi_data
            .get(&(subgraph, block))
            .copied()
            .ok_or(EngineError::NoConsensusAvailable { subgraph, block })
    }

    fn is_compliant(&self, indexer: Account) -> bool {
        self.verdicts.get(&indexer).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subgraph(tag: u8) -> SubgraphId {
        SubgraphId::from_bytes([tag; 32])
    }

    #[test]
    fn missing_consensus_errors_not_zero() {
        let oracle = InMemoryOracle::new();
        let err = oracle.consensus_poi(subgraph(1), 100).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NoConsensusAvailable { block: 100, .. }
        ));
    }

    #[test]
    fn recorded_poi_is_returned() {
        let mut oracle = InMemoryOracle::new();
        let poi = ConsensusPoi::new([0xab; 32], 5_000);
        oracle.record_poi(subgraph(1), 100, poi);
        assert_eq!(oracle.consensus_poi(subgraph(1), 100).unwrap(), poi);
        assert_eq!(oracle.poi_count(), 1);
    }

    #[test]
    fn rerecording_overwrites() {
        let mut oracle = InMemoryOracle::new();
        oracle.record_poi(subgraph(1), 100, ConsensusPoi::new([1; 32], 10));
        oracle.record_poi(subgraph(1), 100, ConsensusPoi::new([2; 32], 20));
        let poi = oracle.consensus_poi(subgraph(1), 100).unwrap();
        assert_eq!(poi.poi, [2; 32]);
        assert_eq!(poi.attesting_stake, 20);
        assert_eq!(oracle.poi_count(), 1);
    }

    #[test]
    fn points_are_independent() {
        let mut oracle = InMemoryOracle::new();
        oracle.record_poi(subgraph(1), 100, ConsensusPoi::new([1; 32], 10));
        assert!(oracle.consensus_poi(subgraph(1), 101).is_err());
        assert!(oracle.consensus_poi(subgraph(2), 100).is_err());
    }

    #[test]
    fn unknown_indexer_is_non_compliant() {
        let oracle = InMemoryOracle::new();
        assert!(!oracle.is_compliant(Account::random()));
    }

    #[test]
    fn verdict_reflects_latest_value() {
        let mut oracle = InMemoryOracle::new();
        let indexer = Account::random();
        oracle.set_compliance(indexer, true);
        assert!(oracle.is_compliant(indexer));
        oracle.set_compliance(indexer, false);
        assert!(!oracle.is_compliant(indexer));
    }
}
