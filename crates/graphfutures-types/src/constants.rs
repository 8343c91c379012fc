//! System-wide constants for the GraphFutures settlement engine.

/// Domain tag prefixed to audit receipt payloads before hashing.
pub const RECEIPT_DOMAIN: &[u8] = b"graphfutures:receipt:v1:";

/// Size in bytes of a proof-of-indexing digest.
pub const POI_DIGEST_LEN: usize = 32;

/// Size in bytes of an account identifier.
pub const ACCOUNT_LEN: usize = 20;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "GraphFutures";
