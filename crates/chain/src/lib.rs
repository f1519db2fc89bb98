//! In-memory ledger environment.
//!
//! Stands in for the proof-based chain: orders transactions into blocks,
//! records typed events in inclusion order, and assigns the global sequence
//! numbers that make the action log replayable. Networking, fees and real
//! consensus are out of scope.

mod action_log;
mod events;
mod ledger;

pub use action_log::ActionLogReader;
pub use events::{EventPayload, EventRecord, OracleEvent, OracleRequestData, TokenEvent};
pub use ledger::{MemLedger, TxnCtx};
