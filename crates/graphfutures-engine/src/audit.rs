//! Append-only audit trail of engine events.
//!
//! Every successful mutating operation appends exactly one hashed receipt.
//! The payload hash commits to the canonical JSON encoding of the event
//! under the receipt domain tag, so the trail can be independently verified.

use chrono::Utc;
use graphfutures_types::{constants, AuditRecord, EngineEvent, ReceiptId};
use sha2::{Digest, Sha256};

/// Append-only log of [`AuditRecord`]s.
pub struct AuditLog {
    records: Vec<AuditRecord>,
}

impl AuditLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a receipt for the given event and return it.
    pub fn append(&mut self, event: EngineEvent) -> &AuditRecord {
        let payload =
            serde_json::to_vec(&event).expect("engine events serialize infallibly to JSON");
        let payload_hash = Self::hash_payload(&payload);

        let record = AuditRecord {
            id: ReceiptId::new(),
            event,
            payload_hash,
            issued_at: Utc::now(),
        };
        tracing::debug!(
            receipt = %record.id,
            kind = record.kind(),
            hash = hex::encode(payload_hash),
            "Audit receipt appended"
        );
        self.records.push(record);
        self.records.last().expect("record just pushed")
    }

    /// Domain-tagged SHA-256 over an event payload.
    #[must_use]
    pub fn hash_payload(payload: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::RECEIPT_DOMAIN);
        hasher.update(payload);
        hasher.finalize().into()
    }

    /// All receipts, in append order.
    #[must_use]
    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Number of receipts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphfutures_types::Account;

    fn staked_event(amount: u128) -> EngineEvent {
        EngineEvent::IndexerStaked {
            indexer: Account::from_bytes([1; 20]),
            amount,
        }
    }

    #[test]
    fn append_records_in_order() {
        let mut log = AuditLog::new();
        assert!(log.is_empty());

        log.append(staked_event(100));
        log.append(staked_event(200));

        assert_eq!(log.len(), 2);
        assert!(matches!(
            log.records()[0].event,
            EngineEvent::IndexerStaked { amount: 100, .. }
        ));
        assert!(matches!(
            log.records()[1].event,
            EngineEvent::IndexerStaked { amount: 200, .. }
        ));
        assert!(log.records()[0].id < log.records()[1].id);
    }

    #[test]
    fn payload_hash_is_deterministic() {
        let mut log = AuditLog::new();
        let a = log.append(staked_event(100)).payload_hash;
        let b = log.append(staked_event(100)).payload_hash;
        assert_eq!(a, b);
    }

    #[test]
    fn payload_hash_differs_by_event() {
        let mut log = AuditLog::new();
        let a = log.append(staked_event(100)).payload_hash;
        let b = log.append(staked_event(101)).payload_hash;
        assert_ne!(a, b);
    }

    #[test]
    fn hash_commits_to_canonical_payload() {
        let event = staked_event(42);
        let payload = serde_json::to_vec(&event).unwrap();
        let mut log = AuditLog::new();
        let record_hash = log.append(event).payload_hash;
        assert_eq!(record_hash, AuditLog::hash_payload(&payload));
    }
}
