//! Pending update actions.
//!
//! Contract methods never mutate committed state directly. They stage
//! [`UpdateAction`]s, which the ledger sequences in inclusion order and a
//! later settlement folds into a new commitment.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use oc20_primitives::{AccountId, Buf32, TokenAmount, hash_borsh};
use serde::{Deserialize, Serialize};

/// What a pending update targets: one map entry, or the singleton
/// total-supply cell.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Arbitrary,
    BorshDeserialize,
    BorshSerialize,
    Deserialize,
    Serialize,
)]
pub enum ActionTarget {
    Account(AccountId),
    TotalSupply,
}

/// A recorded intent to change one target's value.
///
/// `expected_old` is the value the staging transaction observed in settled
/// state (`None` = no entry). Settlement applies the action only if the live
/// value at replay time still equals it, first writer wins.
#[derive(
    Clone,
    Debug,
    Eq,
    PartialEq,
    Arbitrary,
    BorshDeserialize,
    BorshSerialize,
    Deserialize,
    Serialize,
)]
pub struct UpdateAction {
    target: ActionTarget,
    expected_old: Option<TokenAmount>,
    new_value: TokenAmount,
}

impl UpdateAction {
    pub fn new(
        target: ActionTarget,
        expected_old: Option<TokenAmount>,
        new_value: TokenAmount,
    ) -> Self {
        Self {
            target,
            expected_old,
            new_value,
        }
    }

    pub fn target(&self) -> &ActionTarget {
        &self.target
    }

    pub fn expected_old(&self) -> Option<TokenAmount> {
        self.expected_old
    }

    pub fn new_value(&self) -> TokenAmount {
        self.new_value
    }
}

/// An [`UpdateAction`] as emitted on the ledger, with the global sequence
/// number assigned at event-inclusion time.
#[derive(
    Clone,
    Debug,
    Eq,
    PartialEq,
    Arbitrary,
    BorshDeserialize,
    BorshSerialize,
    Deserialize,
    Serialize,
)]
pub struct SequencedAction {
    seq_no: u64,
    action: UpdateAction,
}

impl SequencedAction {
    pub fn new(seq_no: u64, action: UpdateAction) -> Self {
        Self { seq_no, action }
    }

    pub fn seq_no(&self) -> u64 {
        self.seq_no
    }

    pub fn action(&self) -> &UpdateAction {
        &self.action
    }
}

/// Digest binding an ordered slice of sequenced actions, used to tie a chunk
/// proof to the exact actions it consumed.
pub fn compute_actions_digest(actions: &[SequencedAction]) -> Buf32 {
    hash_borsh(b"oc20:actions", &actions.to_vec())
}
