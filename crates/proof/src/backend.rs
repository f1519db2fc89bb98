//! Proof backend trait.

use crate::{
    errors::ProofResult,
    statement::{ChunkProof, ChunkStatement, SettlementProof},
};

/// The external proof system, reduced to the three operations settlement
/// needs. Implementations are expected to be CPU-bound and slow; callers
/// run them off the async runtime (see the settlement job).
pub trait ProofBackend: Send + Sync {
    /// Produces a proof attesting one chunk statement.
    fn prove_chunk(&self, statement: &ChunkStatement) -> ProofResult<ChunkProof>;

    /// Composes a chain of chunk proofs into one settlement artifact.
    ///
    /// Chunks must be in order and each must extend the previous one's new
    /// commitment.
    fn compose(&self, chunks: &[ChunkProof]) -> ProofResult<SettlementProof>;

    /// Verifies a settlement artifact. This is what the on-chain applier
    /// runs before checking the commitment precondition.
    fn verify_settlement(&self, proof: &SettlementProof) -> ProofResult<()>;
}
