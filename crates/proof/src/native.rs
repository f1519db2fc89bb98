//! Native proof backend.
//!
//! Binds statements with domain-tagged digests instead of real proofs, the
//! same role the native host plays for a zkVM: full pipeline semantics
//! (chaining, composition, verification) with none of the proving cost.
//! The replay equivalence tests carry the soundness burden that a real
//! backend would discharge cryptographically.

use oc20_primitives::{Buf32, hash_borsh};

use crate::{
    backend::ProofBackend,
    errors::{ProofError, ProofResult},
    statement::{ChunkProof, ChunkStatement, SettlementProof},
};

/// Stand-in backend used outside proving environments.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeBackend;

impl NativeBackend {
    pub fn new() -> Self {
        Self
    }

    fn chunk_seal(statement: &ChunkStatement) -> Buf32 {
        hash_borsh(b"oc20:native:chunk", statement)
    }

    fn settlement_seal(proof: &SettlementProof) -> Buf32 {
        hash_borsh(
            b"oc20:native:settle",
            &(proof.old_commitment(), proof.new_commitment()),
        )
    }
}

impl ProofBackend for NativeBackend {
    fn prove_chunk(&self, statement: &ChunkStatement) -> ProofResult<ChunkProof> {
        let seal = Self::chunk_seal(statement);
        Ok(ChunkProof::new(
            statement.clone(),
            seal.as_slice().to_vec(),
        ))
    }

    fn compose(&self, chunks: &[ChunkProof]) -> ProofResult<SettlementProof> {
        let first = chunks.first().ok_or(ProofError::EmptyChunkSequence)?;

        let mut prev = first.statement().old_commitment();
        for (index, chunk) in chunks.iter().enumerate() {
            if Self::chunk_seal(chunk.statement()).as_slice() != chunk.seal() {
                return Err(ProofError::InvalidSeal);
            }
            if chunk.statement().old_commitment() != prev {
                return Err(ProofError::BrokenChunkChain { index });
            }
            prev = chunk.statement().new_commitment();
        }

        let last = chunks.last().expect("proof: nonempty checked above");
        let proof = SettlementProof::new(
            *first.statement().old_commitment(),
            *last.statement().new_commitment(),
            Vec::new(),
        );
        let seal = Self::settlement_seal(&proof);
        Ok(SettlementProof::new(
            *proof.old_commitment(),
            *proof.new_commitment(),
            seal.as_slice().to_vec(),
        ))
    }

    fn verify_settlement(&self, proof: &SettlementProof) -> ProofResult<()> {
        let expected = Self::settlement_seal(proof);
        if expected.as_slice() != proof.seal() {
            return Err(ProofError::InvalidSeal);
        }
        Ok(())
    }
}
