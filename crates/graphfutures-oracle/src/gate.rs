//! The compliance gate capability trait.

use graphfutures_types::{Account, ConsensusPoi, Result, SubgraphId};

/// Read-only gate to the external performance oracle.
///
/// Both queries are side-effect-free and must be callable at any time,
/// including inside the atomic settlement step.
///
/// Implementations are black boxes: the engine must not assume a verdict is
/// monotonic or stable between calls — compliance is evaluated fresh at
/// settlement time, never cached.
pub trait ComplianceOracle {
    /// The consensus proof-of-indexing for `(subgraph, block)`.
    ///
    /// # Errors
    /// Returns [`EngineError::NoConsensusAvailable`] when no attestations
    /// have been recorded for the queried point. "Unknown" is never reported
    /// as a zero digest.
    ///
    /// [`EngineError::NoConsensusAvailable`]: graphfutures_types::EngineError::NoConsensusAvailable
    fn consensus_poi(&self, subgraph: SubgraphId, block: u64) -> Result<ConsensusPoi>;

    /// The externally-computed compliance verdict for an indexer.
    fn is_compliant(&self, indexer: Account) -> bool;
}
