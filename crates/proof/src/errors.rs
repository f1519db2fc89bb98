use thiserror::Error;

pub type ProofResult<T> = Result<T, ProofError>;

/// Proof construction and verification errors.
#[derive(Debug, Error)]
pub enum ProofError {
    #[error("no chunk proofs to compose")]
    EmptyChunkSequence,

    /// Consecutive chunk proofs must chain: each chunk's old commitment is
    /// the previous chunk's new commitment.
    #[error("chunk {index} does not extend the previous chunk's commitment")]
    BrokenChunkChain { index: usize },

    #[error("proof seal failed verification")]
    InvalidSeal,

    /// Backend resource failure (out of memory, prover timeout, ...).
    /// Retryable; the enclosing settlement aborts without side effects.
    #[error("proof backend failure: {0}")]
    Backend(String),
}
