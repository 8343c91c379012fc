//! Consensus proof-of-indexing read model.
//!
//! Produced by the external attestation-aggregation mechanism and consumed
//! read-only by the engine. Never owned or mutated here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Externally-computed consensus value for a `(subgraph, block)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsensusPoi {
    /// The consensus proof-of-indexing digest.
    pub poi: [u8; 32],
    /// Total stake weight attesting to this digest, in base units.
    pub attesting_stake: u128,
}

impl ConsensusPoi {
    #[must_use]
    pub fn new(poi: [u8; 32], attesting_stake: u128) -> Self {
        Self {
            poi,
            attesting_stake,
        }
    }

    /// Hex rendering of the digest, for logs and display.
    #[must_use]
    pub fn poi_hex(&self) -> String {
        hex::encode(self.poi)
    }
}

impl fmt::Display for ConsensusPoi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "poi:{} (attesting stake {})",
            hex::encode(&self.poi[..8]),
            self.attesting_stake
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_digest_prefix_and_stake() {
        let poi = ConsensusPoi::new([0xaa; 32], 1_000_000);
        let s = format!("{poi}");
        assert!(s.contains("poi:aaaaaaaaaaaaaaaa"));
        assert!(s.contains("1000000"));
    }

    #[test]
    fn poi_hex_is_full_digest() {
        let poi = ConsensusPoi::new([0x01; 32], 0);
        assert_eq!(poi.poi_hex().len(), 64);
    }

    #[test]
    fn serde_roundtrip() {
        let poi = ConsensusPoi::new([7; 32], u128::MAX);
        let json = serde_json::to_string(&poi).unwrap();
        let back: ConsensusPoi = serde_json::from_str(&json).unwrap();
        assert_eq!(poi, back);
    }
}
