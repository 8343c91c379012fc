//! # graphfutures-types
//!
//! Shared types, errors, and configuration for the **GraphFutures**
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Account`], [`SubgraphId`], [`ReceiptId`]
//! - **Collateral model**: [`StakeRecord`]
//! - **Future model**: [`Future`], [`FutureStatus`], [`PairKey`]
//! - **Oracle model**: [`ConsensusPoi`]
//! - **Event model**: [`EngineEvent`], [`SettlementOutcome`]
//! - **Receipt model**: [`AuditRecord`]
//! - **Configuration**: [`PolicyConfig`]
//! - **Errors**: [`EngineError`] with `GF_ERR_` prefix codes
//! - **Constants**: system-wide defaults and domain tags

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod future;
pub mod ids;
pub mod poi;
pub mod receipt;
pub mod stake;

// Re-export all primary types at crate root for ergonomic imports:
//   use graphfutures_types::{Account, Future, StakeRecord, ...};

pub use config::*;
pub use error::*;
pub use event::*;
pub use future::*;
pub use ids::*;
pub use poi::*;
pub use receipt::*;
pub use stake::*;

// Constants are accessed via `graphfutures_types::constants::FOO`
// (not re-exported to avoid name collisions).
