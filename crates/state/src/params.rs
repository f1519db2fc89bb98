//! Settlement capacity parameters.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest supported `log_total_capacity`.
///
/// Keeps leaf indexing within `u64` with plenty of margin; practical
/// deployments sit far below this.
pub const MAX_LOG_TOTAL_CAPACITY: u8 = 32;

/// Capacity parameters fixed at contract construction time.
///
/// There is no migration path, so these must never change over a contract's
/// lifetime.
#[derive(
    Copy,
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
pub struct SettlementParams {
    /// Log2 of the maximum number of distinct keys the ledger may ever hold.
    log_total_capacity: u8,

    /// Maximum number of actions folded into a single chunk proof.
    max_actions_per_proof: usize,
}

impl SettlementParams {
    pub fn new(log_total_capacity: u8, max_actions_per_proof: usize) -> Result<Self, ParamsError> {
        let params = Self {
            log_total_capacity,
            max_actions_per_proof,
        };
        params.validate()?;
        Ok(params)
    }

    /// Revalidates the parameters, e.g. after deserializing them from
    /// external configuration.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.log_total_capacity == 0 {
            return Err(ParamsError::ZeroCapacity);
        }
        if self.log_total_capacity > MAX_LOG_TOTAL_CAPACITY {
            return Err(ParamsError::CapacityTooLarge(self.log_total_capacity));
        }
        if self.max_actions_per_proof == 0 {
            return Err(ParamsError::ZeroProofChunkSize);
        }
        Ok(())
    }

    pub fn log_total_capacity(&self) -> u8 {
        self.log_total_capacity
    }

    /// Maximum number of distinct keys, `2^log_total_capacity`.
    pub fn total_capacity(&self) -> u64 {
        1u64 << self.log_total_capacity
    }

    pub fn max_actions_per_proof(&self) -> usize {
        self.max_actions_per_proof
    }
}

/// Invalid capacity configuration. These abort contract construction.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("log_total_capacity must be nonzero")]
    ZeroCapacity,

    #[error("log_total_capacity {0} exceeds maximum {MAX_LOG_TOTAL_CAPACITY}")]
    CapacityTooLarge(u8),

    #[error("max_actions_per_proof must be nonzero")]
    ZeroProofChunkSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_validation() {
        assert!(SettlementParams::new(10, 5).is_ok());
        assert!(matches!(
            SettlementParams::new(0, 5),
            Err(ParamsError::ZeroCapacity)
        ));
        assert!(matches!(
            SettlementParams::new(40, 5),
            Err(ParamsError::CapacityTooLarge(40))
        ));
        assert!(matches!(
            SettlementParams::new(10, 0),
            Err(ParamsError::ZeroProofChunkSize)
        ));
    }
}
