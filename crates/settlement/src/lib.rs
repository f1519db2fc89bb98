//! Settlement proof construction.
//!
//! Folds the pending action window into a chain of chunk proofs and one
//! aggregate settlement artifact, replaying actions against a working copy
//! of the settled state with first-writer-wins conflict handling. Nothing
//! here mutates live state; the on-chain applier is the only writer.

mod builder;
mod errors;
mod job;
mod report;

pub use builder::{SettlementBuilder, SettlementOutcome, SettlementRun};
pub use errors::{SettlementError, SettlementResult};
pub use job::{JobStatus, SettlementJob, SettlementJobHandle};
pub use report::{DropReason, DroppedAction, SettlementReport};
