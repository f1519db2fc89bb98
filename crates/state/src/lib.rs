//! Offchain token ledger state: update actions, the committed sparse Merkle
//! ledger, and the host-side map store the contract methods stage against.

mod action;
mod commitment;
mod errors;
mod merkle;
mod params;
mod replay;
mod store;

pub use action::{ActionTarget, SequencedAction, UpdateAction, compute_actions_digest};
pub use commitment::{
    CommitmentCell, StateCommitment, compute_account_leaf_digest, compute_supply_cell_digest,
};
pub use errors::{StateError, StateResult};
pub use merkle::{MerkleProof, SparseMerkleTree};
pub use params::{MAX_LOG_TOTAL_CAPACITY, ParamsError, SettlementParams};
pub use replay::ReplayState;
pub use store::{AccountWitness, OffchainLedger};
