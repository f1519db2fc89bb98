use oc20_primitives::{AccountId, TokenAmount};
use oc20_proof::ProofError;
use oc20_state::{StateCommitment, StateError};
use thiserror::Error;

pub type TokenResult<T> = Result<T, TokenError>;

/// Token contract errors. All of these reject the enclosing transaction
/// before any state change or event emission.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("account {account} has {have}, needs {need}")]
    InsufficientBalance {
        account: AccountId,
        have: TokenAmount,
        need: TokenAmount,
    },

    #[error("unknown account {0}")]
    UnknownAccount(AccountId),

    #[error("allowance of {spender} for {owner} is {have}, needs {need}")]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        have: TokenAmount,
        need: TokenAmount,
    },

    #[error("token amount overflow")]
    AmountOverflow,

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("no oracle contract configured")]
    OracleNotConfigured,

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Settle(#[from] SettleError),
}

/// Fatal construction-time configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("token name must not be empty")]
    EmptyName,

    #[error("token symbol must not be empty")]
    EmptySymbol,

    #[error("token symbol of {0} bytes exceeds maximum")]
    SymbolTooLong(usize),

    #[error("{0} decimals exceeds maximum")]
    DecimalsTooLarge(u8),
}

/// Settlement applier errors.
#[derive(Debug, Error)]
pub enum SettleError {
    /// The proof's base commitment no longer matches the contract's. A
    /// concurrent settlement won the race; rebuild from the new commitment.
    #[error("stale settlement proof: built on {proof_old:?}, contract at {current:?}")]
    StaleCommitment {
        proof_old: StateCommitment,
        current: StateCommitment,
    },

    /// A replayed state was offered for reconciliation but does not match
    /// the commitment the chain accepted.
    #[error("replayed state does not match the settled commitment")]
    ReconcileMismatch,

    #[error(transparent)]
    Proof(#[from] ProofError),
}
