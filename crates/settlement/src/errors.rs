use oc20_proof::ProofError;
use oc20_state::StateError;
use thiserror::Error;

pub type SettlementResult<T> = Result<T, SettlementError>;

/// Settlement construction errors. Any of these abort the whole cycle; no
/// partial state is left behind anywhere.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// There were no pending actions to fold. Not a failure of anything,
    /// but building an empty settlement is pointless and the caller should
    /// know.
    #[error("empty pending window, nothing to settle")]
    EmptyPendingWindow,

    /// The action window was not in strict emission order. The log is the
    /// single source of truth for replay order, so this means the caller
    /// fed us something else.
    #[error("action {seq_no} out of order, replay watermark already at {watermark}")]
    OutOfOrderAction { seq_no: u64, watermark: u64 },

    #[error("chunk of {got} actions exceeds per-proof limit {limit}")]
    ChunkTooLarge { got: usize, limit: usize },

    #[error("settlement job cancelled")]
    Cancelled,

    #[error("settlement job did not run to completion")]
    TaskFailed,

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Proof(#[from] ProofError),
}
