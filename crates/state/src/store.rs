//! Host-side offchain map store.
//!
//! Authoritative mirror of the settled key-value map plus a staging overlay
//! for in-process reads. Staging never mutates the settled view; the settled
//! view only advances when a settlement the chain accepted is reconciled
//! back via [`OffchainLedger::commit_settlement`].

use std::collections::HashMap;

use oc20_primitives::{AccountId, TokenAmount};

use crate::{
    action::{ActionTarget, UpdateAction},
    commitment::{StateCommitment, compute_account_leaf_digest, compute_supply_cell_digest},
    errors::{StateError, StateResult},
    merkle::{MerkleProof, SparseMerkleTree},
    params::SettlementParams,
    replay::ReplayState,
};

/// Host-side mirror of the offchain token map and the total-supply cell.
#[derive(Clone, Debug)]
pub struct OffchainLedger {
    params: SettlementParams,

    /// Merkle tree over the settled account map.
    tree: SparseMerkleTree,

    /// Settled account values, the last state the chain accepted.
    settled: HashMap<AccountId, TokenAmount>,

    /// Leaf slot per account. Covers settled accounts and accounts that have
    /// only been staged so far; staging is what allocates.
    slots: HashMap<AccountId, u64>,
    next_slot: u64,

    settled_supply: Option<TokenAmount>,

    /// Staging overlay: last-write-wins view of values staged since the
    /// last settlement, for in-process reads only.
    staged: HashMap<AccountId, TokenAmount>,
    staged_supply: Option<TokenAmount>,

    /// Sequence number up to which (exclusive) actions are settled.
    actions_consumed: u64,
}

impl OffchainLedger {
    pub fn new(params: SettlementParams) -> Self {
        Self {
            tree: SparseMerkleTree::new(params.log_total_capacity()),
            params,
            settled: HashMap::new(),
            slots: HashMap::new(),
            next_slot: 0,
            settled_supply: None,
            staged: HashMap::new(),
            staged_supply: None,
            actions_consumed: 0,
        }
    }

    pub fn params(&self) -> &SettlementParams {
        &self.params
    }

    /// Locally-known value: staged writes shadow settled state. Not trusted
    /// against the chain until the next settlement is reconciled.
    pub fn get(&self, account: &AccountId) -> Option<TokenAmount> {
        self.staged
            .get(account)
            .copied()
            .or_else(|| self.settled.get(account).copied())
    }

    /// Value as of the last settled commitment.
    pub fn get_settled(&self, account: &AccountId) -> Option<TokenAmount> {
        self.settled.get(account).copied()
    }

    /// Locally-known total supply, staged writes included.
    pub fn total_supply(&self) -> Option<TokenAmount> {
        self.staged_supply.or(self.settled_supply)
    }

    /// Total supply as of the last settled commitment.
    pub fn total_supply_settled(&self) -> Option<TokenAmount> {
        self.settled_supply
    }

    pub fn actions_consumed(&self) -> u64 {
        self.actions_consumed
    }

    /// Stages an update of an account entry.
    ///
    /// The returned action carries `expected_old` as observed in *settled*
    /// state, which is the concurrency contract checked at settlement time;
    /// the staged value only shadows local reads.
    pub fn stage_account_update(
        &mut self,
        account: &AccountId,
        new_value: TokenAmount,
    ) -> StateResult<UpdateAction> {
        self.ensure_slot(account)?;
        let expected = self.settled.get(account).copied();
        self.staged.insert(*account, new_value);
        Ok(UpdateAction::new(
            ActionTarget::Account(*account),
            expected,
            new_value,
        ))
    }

    /// Stages the creation of an account entry: `expected_old` is forced to
    /// "no entry", so of several creations racing for one key exactly the
    /// first to settle wins and the rest drop.
    pub fn stage_account_create(
        &mut self,
        account: &AccountId,
        value: TokenAmount,
    ) -> StateResult<UpdateAction> {
        self.ensure_slot(account)?;
        self.staged.insert(*account, value);
        Ok(UpdateAction::new(
            ActionTarget::Account(*account),
            None,
            value,
        ))
    }

    /// Stages an update of the total-supply cell. Because the cell is a
    /// singleton, at most one such update per settlement cycle survives.
    pub fn stage_supply_update(&mut self, new_value: TokenAmount) -> UpdateAction {
        let expected = self.settled_supply;
        self.staged_supply = Some(new_value);
        UpdateAction::new(ActionTarget::TotalSupply, expected, new_value)
    }

    fn ensure_slot(&mut self, account: &AccountId) -> StateResult<u64> {
        if let Some(slot) = self.slots.get(account) {
            return Ok(*slot);
        }
        if self.next_slot >= self.params.total_capacity() {
            return Err(StateError::CapacityExceeded {
                capacity: self.params.total_capacity(),
            });
        }
        let slot = self.next_slot;
        self.slots.insert(*account, slot);
        self.next_slot += 1;
        Ok(slot)
    }

    /// Commitment to the settled state.
    pub fn commitment(&self) -> StateCommitment {
        StateCommitment::new(
            self.tree.root(),
            compute_supply_cell_digest(self.settled_supply),
            self.actions_consumed,
        )
    }

    /// Membership witness for a settled account against [`Self::commitment`].
    ///
    /// Returns [`StateError::UnknownAccount`] for keys the settled map does
    /// not contain; absence of a key is observable directly from the
    /// authoritative mirror.
    pub fn witness(&self, account: &AccountId) -> StateResult<AccountWitness> {
        let value = self
            .settled
            .get(account)
            .copied()
            .ok_or(StateError::UnknownAccount(*account))?;
        let slot = *self
            .slots
            .get(account)
            .ok_or(StateError::UnknownAccount(*account))?;
        Ok(AccountWitness {
            account: *account,
            value,
            proof: self.tree.open(slot),
        })
    }

    /// Detached working copy of the settled state for the settlement
    /// builder to replay pending actions against.
    pub fn replay_view(&self) -> ReplayState {
        // Staged-only slot allocations are deliberately not part of the
        // view; the replay re-derives allocation from action order, which
        // keeps the result a pure function of (settled state, actions).
        let settled_slots: HashMap<AccountId, u64> = self
            .slots
            .iter()
            .filter(|(id, _)| self.settled.contains_key(id))
            .map(|(id, slot)| (*id, *slot))
            .collect();
        ReplayState::from_parts(
            self.params,
            self.tree.clone(),
            self.settled.clone(),
            settled_slots,
            self.settled_supply,
            self.actions_consumed,
        )
    }

    /// Adopts a replayed state after the chain accepted the corresponding
    /// settlement proof.
    ///
    /// The staging overlay is discarded: every action staged before the
    /// settlement snapshot has been consumed (applied or dropped), and reads
    /// must refresh from the new settled view.
    pub fn commit_settlement(&mut self, post: ReplayState) {
        let (tree, values, slots, supply, watermark) = post.into_parts();
        self.tree = tree;
        self.settled = values;
        self.next_slot = slots.len() as u64;
        self.slots = slots;
        self.settled_supply = supply;
        self.actions_consumed = watermark;
        self.staged.clear();
        self.staged_supply = None;
    }
}

/// Proof that an account had a particular value under a settled commitment.
#[derive(Clone, Debug)]
pub struct AccountWitness {
    account: AccountId,
    value: TokenAmount,
    proof: MerkleProof,
}

impl AccountWitness {
    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn value(&self) -> TokenAmount {
        self.value
    }

    pub fn proof(&self) -> &MerkleProof {
        &self.proof
    }

    /// Verifies the witness against a commitment's ledger root.
    pub fn verify(&self, commitment: &StateCommitment) -> bool {
        let leaf = compute_account_leaf_digest(&self.account, self.value);
        self.proof.verify(commitment.ledger_root(), leaf)
    }
}
