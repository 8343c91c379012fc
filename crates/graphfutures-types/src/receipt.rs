//! Audit receipt types for the GraphFutures audit trail.
//!
//! Every successful mutating operation produces a hashed [`AuditRecord`]
//! so settlements, cancellations, and stakes can be independently replayed
//! and verified against the event payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineEvent, ReceiptId};

/// A record in the append-only audit trail.
///
/// The `payload_hash` commits to the canonical JSON encoding of the event,
/// prefixed with the receipt domain tag (see `constants::RECEIPT_DOMAIN`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique, time-ordered receipt identifier.
    pub id: ReceiptId,
    /// The event this receipt proves.
    pub event: EngineEvent,
    /// SHA-256 hash over the domain-tagged event payload.
    pub payload_hash: [u8; 32],
    /// When this receipt was issued. Audit metadata only — settlement
    /// semantics use the host-supplied clock, never wall-clock time.
    pub issued_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Stable tag of the underlying event.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.event.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Account;

    #[test]
    fn record_kind_matches_event() {
        let record = AuditRecord {
            id: ReceiptId::new(),
            event: EngineEvent::IndexerStaked {
                indexer: Account::from_bytes([1; 20]),
                amount: 1000,
            },
            payload_hash: [0; 32],
            issued_at: Utc::now(),
        };
        assert_eq!(record.kind(), "INDEXER_STAKED");
    }

    #[test]
    fn serde_roundtrip() {
        let record = AuditRecord {
            id: ReceiptId::new(),
            event: EngineEvent::IndexerStaked {
                indexer: Account::from_bytes([3; 20]),
                amount: 7,
            },
            payload_hash: [9; 32],
            issued_at: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: AuditRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.id, back.id);
        assert_eq!(record.event, back.event);
        assert_eq!(record.payload_hash, back.payload_hash);
    }
}
