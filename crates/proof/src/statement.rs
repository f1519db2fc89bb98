//! Proof statements and artifacts.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use oc20_primitives::Buf32;
use oc20_state::StateCommitment;
use serde::{Deserialize, Serialize};

/// What one chunk proof attests: that folding the actions bound by
/// `actions_digest` into the state committed by `old_commitment` yields
/// `new_commitment`.
///
/// The consumed sequence range is carried by the commitments' watermarks.
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
pub struct ChunkStatement {
    old_commitment: StateCommitment,
    new_commitment: StateCommitment,
    actions_digest: Buf32,
}

impl ChunkStatement {
    pub fn new(
        old_commitment: StateCommitment,
        new_commitment: StateCommitment,
        actions_digest: Buf32,
    ) -> Self {
        Self {
            old_commitment,
            new_commitment,
            actions_digest,
        }
    }

    pub fn old_commitment(&self) -> &StateCommitment {
        &self.old_commitment
    }

    pub fn new_commitment(&self) -> &StateCommitment {
        &self.new_commitment
    }

    pub fn actions_digest(&self) -> &Buf32 {
        &self.actions_digest
    }
}

/// Opaque proof for one chunk of folded actions.
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
pub struct ChunkProof {
    statement: ChunkStatement,
    seal: Vec<u8>,
}

impl ChunkProof {
    pub fn new(statement: ChunkStatement, seal: Vec<u8>) -> Self {
        Self { statement, seal }
    }

    pub fn statement(&self) -> &ChunkStatement {
        &self.statement
    }

    pub fn seal(&self) -> &[u8] {
        &self.seal
    }
}

/// The aggregate settlement artifact: one verifiable object binding the
/// transition from the oldest unconsumed commitment to the final one.
///
/// Constructed offchain, consumed exactly once by the on-chain applier.
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
pub struct SettlementProof {
    old_commitment: StateCommitment,
    new_commitment: StateCommitment,
    seal: Vec<u8>,
}

impl SettlementProof {
    pub fn new(
        old_commitment: StateCommitment,
        new_commitment: StateCommitment,
        seal: Vec<u8>,
    ) -> Self {
        Self {
            old_commitment,
            new_commitment,
            seal,
        }
    }

    pub fn old_commitment(&self) -> &StateCommitment {
        &self.old_commitment
    }

    pub fn new_commitment(&self) -> &StateCommitment {
        &self.new_commitment
    }

    pub fn seal(&self) -> &[u8] {
        &self.seal
    }

    /// Sequence range of actions this settlement consumes, as
    /// `[start, end)`.
    pub fn consumed_range(&self) -> (u64, u64) {
        (
            self.old_commitment.actions_consumed(),
            self.new_commitment.actions_consumed(),
        )
    }
}
