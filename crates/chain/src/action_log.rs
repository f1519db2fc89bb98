//! Action log reader.

use oc20_state::SequencedAction;

use crate::{events::EventPayload, ledger::MemLedger};

/// Read-side of the action log: the ordered window of staged actions that
/// settlement has not yet consumed.
///
/// The underlying ledger's inclusion order is the single source of truth
/// for replay order; the reader just filters and re-sequences nothing.
#[derive(Copy, Clone, Debug)]
pub struct ActionLogReader<'l> {
    ledger: &'l MemLedger,
}

impl<'l> ActionLogReader<'l> {
    pub fn new(ledger: &'l MemLedger) -> Self {
        Self { ledger }
    }

    /// Iterates actions with sequence numbers at or after `watermark`, in
    /// emission order. Finite and restartable: calling again yields the
    /// same sequence as long as the ledger hasn't grown.
    pub fn pending_since(&self, watermark: u64) -> impl Iterator<Item = SequencedAction> + 'l {
        self.ledger.events().iter().filter_map(move |record| {
            let seq_no = record.action_seq()?;
            if seq_no < watermark {
                return None;
            }
            match record.payload() {
                EventPayload::Action(action) => Some(SequencedAction::new(seq_no, action.clone())),
                _ => None,
            }
        })
    }

    /// Collects the pending window into a vector.
    pub fn collect_pending(&self, watermark: u64) -> Vec<SequencedAction> {
        self.pending_since(watermark).collect()
    }
}
