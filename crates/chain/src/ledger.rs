//! In-memory ledger.

use oc20_state::UpdateAction;

use crate::events::{EventPayload, EventRecord};

/// In-memory stand-in for the chain: transactions are included one at a
/// time, events land in inclusion order, and staged actions get strictly
/// increasing global sequence numbers.
#[derive(Clone, Debug, Default)]
pub struct MemLedger {
    height: u64,
    txns_in_block: u32,
    events: Vec<EventRecord>,
    actions_emitted: u64,
}

impl MemLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    /// Total number of actions ever emitted.
    pub fn actions_emitted(&self) -> u64 {
        self.actions_emitted
    }

    /// Seals the current block; later transactions land in the next one.
    pub fn advance_block(&mut self) {
        self.height += 1;
        self.txns_in_block = 0;
    }

    /// Runs a transaction body. Events emitted into the [`TxnCtx`] are
    /// included only if the body returns `Ok`; a failed transaction leaves
    /// no trace (all-or-nothing per transaction).
    pub fn submit<R, E>(
        &mut self,
        body: impl FnOnce(&mut TxnCtx) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut ctx = TxnCtx::new();
        let out = body(&mut ctx)?;

        let txn_index = self.txns_in_block;
        self.txns_in_block += 1;
        for (event_index, payload) in ctx.events.into_iter().enumerate() {
            let action_seq = match &payload {
                EventPayload::Action(_) => {
                    let seq = self.actions_emitted;
                    self.actions_emitted += 1;
                    Some(seq)
                }
                _ => None,
            };
            self.events.push(EventRecord::new(
                self.height,
                txn_index,
                event_index as u32,
                action_seq,
                payload,
            ));
        }
        Ok(out)
    }

    /// All events in inclusion order.
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }
}

/// Event sink for one in-flight transaction.
#[derive(Debug, Default)]
pub struct TxnCtx {
    events: Vec<EventPayload>,
}

impl TxnCtx {
    fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, payload: EventPayload) {
        self.events.push(payload);
    }

    pub fn emit_action(&mut self, action: UpdateAction) {
        self.emit(EventPayload::Action(action));
    }
}
