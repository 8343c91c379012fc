//! Identifiers used throughout GraphFutures.
//!
//! Participants are identified by an opaque 20-byte [`Account`] supplied by
//! the host execution environment. Subgraphs use a 32-byte [`SubgraphId`].
//! Audit receipts use UUIDv7 [`ReceiptId`]s for time-ordered sorting.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// Opaque, unforgeable participant identifier (indexer or buyer).
///
/// The engine never interprets the bytes — equality and ordering are the
/// only operations required. The host is responsible for authenticity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Account(pub [u8; 20]);

impl Account {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Random account for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Account {
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random::<[u8; 20]>())
    }
}

// ---------------------------------------------------------------------------
// SubgraphId
// ---------------------------------------------------------------------------

/// Identifier for a data-indexing deployment whose proof-of-indexing the
/// oracle attests. 32 raw bytes, host-assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SubgraphId(pub [u8; 32]);

impl SubgraphId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for SubgraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subgraph:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// ReceiptId
// ---------------------------------------------------------------------------

/// Unique identifier for an audit receipt. Uses UUIDv7 so the audit trail
/// sorts lexicographically by issue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ReceiptId(pub Uuid);

impl ReceiptId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ReceiptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rcpt:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_display_is_hex() {
        let account = Account::from_bytes([0xab; 20]);
        let s = format!("{account}");
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 2 + 40);
        assert_eq!(account.short(), "abababab");
    }

    #[test]
    fn account_equality_and_ordering() {
        let a = Account::from_bytes([1; 20]);
        let b = Account::from_bytes([2; 20]);
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(a, Account::from_bytes([1; 20]));
    }

    #[test]
    fn random_accounts_are_distinct() {
        assert_ne!(Account::random(), Account::random());
    }

    #[test]
    fn subgraph_id_display() {
        let id = SubgraphId::from_bytes([0x0f; 32]);
        assert_eq!(format!("{id}"), "subgraph:0f0f0f0f0f0f0f0f");
    }

    #[test]
    fn receipt_id_ordering() {
        let a = ReceiptId::new();
        let b = ReceiptId::new();
        assert!(a < b);
    }

    #[test]
    fn serde_roundtrips() {
        let account = Account::from_bytes([7; 20]);
        let json = serde_json::to_string(&account).unwrap();
        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(account, back);

        let id = SubgraphId::from_bytes([9; 32]);
        let json = serde_json::to_string(&id).unwrap();
        let back: SubgraphId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
