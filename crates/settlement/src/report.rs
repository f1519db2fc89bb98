//! Settlement reports.
//!
//! Conflicting actions are dropped silently as far as the chain is
//! concerned; the report is the out-of-band channel that makes the
//! per-action outcome visible to the submitting side.

use oc20_primitives::TokenAmount;
use serde::{Deserialize, Serialize};

/// Why an action was dropped during replay.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum DropReason {
    /// The live value at application time no longer matched the action's
    /// expectation: another action got there first.
    StaleExpectedValue {
        expected: Option<TokenAmount>,
        live: Option<TokenAmount>,
    },
}

/// One dropped action.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct DroppedAction {
    pub seq_no: u64,
    pub reason: DropReason,
}

/// Per-action outcome of one settlement cycle. Every consumed action is in
/// exactly one of the two lists, each in emission order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SettlementReport {
    applied: Vec<u64>,
    dropped: Vec<DroppedAction>,
}

impl SettlementReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_applied(&mut self, seq_no: u64) {
        self.applied.push(seq_no);
    }

    pub(crate) fn record_dropped(&mut self, seq_no: u64, reason: DropReason) {
        self.dropped.push(DroppedAction { seq_no, reason });
    }

    pub fn applied(&self) -> &[u64] {
        &self.applied
    }

    pub fn dropped(&self) -> &[DroppedAction] {
        &self.dropped
    }

    pub fn was_applied(&self, seq_no: u64) -> bool {
        self.applied.binary_search(&seq_no).is_ok()
    }

    /// Total number of actions this cycle consumed, applied or not.
    pub fn total_consumed(&self) -> usize {
        self.applied.len() + self.dropped.len()
    }
}
