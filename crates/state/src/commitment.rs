//! State commitments.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use oc20_primitives::{AccountId, Buf32, TokenAmount, hash_borsh};
use serde::{Deserialize, Serialize};

/// Succinct digest of the entire offchain state: the account map, the
/// singleton total-supply cell, and the watermark of consumed actions.
///
/// The on-chain copy of this value is the only trusted view of offchain
/// state. It changes exactly once per accepted settlement.
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
pub struct StateCommitment {
    ledger_root: Buf32,
    supply_root: Buf32,
    actions_consumed: u64,
}

impl StateCommitment {
    pub fn new(ledger_root: Buf32, supply_root: Buf32, actions_consumed: u64) -> Self {
        Self {
            ledger_root,
            supply_root,
            actions_consumed,
        }
    }

    pub fn ledger_root(&self) -> &Buf32 {
        &self.ledger_root
    }

    pub fn supply_root(&self) -> &Buf32 {
        &self.supply_root
    }

    /// Sequence number up to which (exclusive) actions are resolved.
    pub fn actions_consumed(&self) -> u64 {
        self.actions_consumed
    }
}

/// The single on-chain cell holding the current [`StateCommitment`].
///
/// Only the settlement applier replaces the value; the commitment-equality
/// precondition there is what makes concurrent settlements single-winner.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommitmentCell {
    current: StateCommitment,
}

impl CommitmentCell {
    pub fn new(initial: StateCommitment) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> &StateCommitment {
        &self.current
    }

    pub fn replace(&mut self, next: StateCommitment) -> StateCommitment {
        core::mem::replace(&mut self.current, next)
    }
}

/// Digest of one occupied account leaf. Binds the key, so an inclusion
/// proof attests the key's value and not just some slot content.
pub fn compute_account_leaf_digest(account: &AccountId, value: TokenAmount) -> Buf32 {
    hash_borsh(b"oc20:leaf:acct", &(account, value))
}

/// Digest of the singleton total-supply cell. `None` (never initialized) is
/// distinct from an explicit zero.
pub fn compute_supply_cell_digest(value: Option<TokenAmount>) -> Buf32 {
    hash_borsh(b"oc20:cell:supply", &value)
}
