use oc20_primitives::AccountId;
use thiserror::Error;

pub type StateResult<T> = Result<T, StateError>;

/// Offchain state errors.
#[derive(Debug, Error)]
pub enum StateError {
    /// The configured key capacity is exhausted. This is a fatal
    /// configuration error, not a retryable failure; the capacity is fixed
    /// at construction time.
    #[error("ledger capacity of {capacity} distinct keys exhausted")]
    CapacityExceeded { capacity: u64 },

    /// Arithmetic on a token amount overflowed.
    #[error("token amount overflow")]
    AmountOverflow,

    /// An operation referenced an account the ledger has never seen.
    #[error("unknown account {0}")]
    UnknownAccount(AccountId),
}
