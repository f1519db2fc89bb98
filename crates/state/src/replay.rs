//! Replay state for settlement construction.
//!
//! A [`ReplayState`] is a detached working copy of the settled ledger that
//! the settlement builder mutates while folding pending actions. Nothing it
//! does affects the live store; after the on-chain applier accepts the
//! resulting proof, the store adopts the replay result wholesale.

use std::collections::HashMap;

use oc20_primitives::{AccountId, TokenAmount};

use crate::{
    action::ActionTarget,
    commitment::{StateCommitment, compute_account_leaf_digest, compute_supply_cell_digest},
    errors::{StateError, StateResult},
    merkle::SparseMerkleTree,
    params::SettlementParams,
};

/// Working copy of settled state, replayed forward by the settlement
/// builder.
#[derive(Clone, Debug)]
pub struct ReplayState {
    params: SettlementParams,
    tree: SparseMerkleTree,
    values: HashMap<AccountId, TokenAmount>,
    slots: HashMap<AccountId, u64>,
    next_slot: u64,
    supply: Option<TokenAmount>,

    /// Sequence number up to which (exclusive) actions have been folded in.
    watermark: u64,
}

impl ReplayState {
    pub(crate) fn from_parts(
        params: SettlementParams,
        tree: SparseMerkleTree,
        values: HashMap<AccountId, TokenAmount>,
        slots: HashMap<AccountId, u64>,
        supply: Option<TokenAmount>,
        watermark: u64,
    ) -> Self {
        let next_slot = slots.len() as u64;
        Self {
            params,
            tree,
            values,
            slots,
            next_slot,
            supply,
            watermark,
        }
    }

    pub fn params(&self) -> &SettlementParams {
        &self.params
    }

    pub fn watermark(&self) -> u64 {
        self.watermark
    }

    /// The live value of a target at the current point of the replay. This
    /// is what an action's `expected_old` is checked against.
    pub fn live_value(&self, target: &ActionTarget) -> Option<TokenAmount> {
        match target {
            ActionTarget::Account(id) => self.values.get(id).copied(),
            ActionTarget::TotalSupply => self.supply,
        }
    }

    /// Writes a target's new value, allocating a leaf slot on first use of
    /// an account key.
    pub fn apply_new_value(&mut self, target: &ActionTarget, value: TokenAmount) -> StateResult<()> {
        match target {
            ActionTarget::Account(id) => {
                let slot = match self.slots.get(id) {
                    Some(slot) => *slot,
                    None => {
                        if self.next_slot >= self.params.total_capacity() {
                            return Err(StateError::CapacityExceeded {
                                capacity: self.params.total_capacity(),
                            });
                        }
                        let slot = self.next_slot;
                        self.slots.insert(*id, slot);
                        self.next_slot += 1;
                        slot
                    }
                };
                self.values.insert(*id, value);
                self.tree.set_leaf(slot, compute_account_leaf_digest(id, value));
            }
            ActionTarget::TotalSupply => {
                self.supply = Some(value);
            }
        }
        Ok(())
    }

    /// Marks the action with the given sequence number as folded in
    /// (applied or dropped, either way consumed).
    pub fn consume_through(&mut self, seq_no: u64) {
        debug_assert!(seq_no >= self.watermark, "replay: sequence went backwards");
        self.watermark = seq_no + 1;
    }

    /// Commitment to the state at the current point of the replay.
    pub fn commitment(&self) -> StateCommitment {
        StateCommitment::new(
            self.tree.root(),
            compute_supply_cell_digest(self.supply),
            self.watermark,
        )
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        SparseMerkleTree,
        HashMap<AccountId, TokenAmount>,
        HashMap<AccountId, u64>,
        Option<TokenAmount>,
        u64,
    ) {
        (self.tree, self.values, self.slots, self.supply, self.watermark)
    }
}
