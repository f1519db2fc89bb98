//! Account identifier types.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::buf::Buf32;

/// Identifier for an account in the token ledger, i.e. the address we key
/// balances by.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshDeserialize,
    BorshSerialize,
    Deserialize,
    Serialize,
)]
pub struct AccountId(Buf32);

impl_buf_wrapper!(AccountId, Buf32, 32);

impl AccountId {
    pub fn inner(&self) -> &Buf32 {
        &self.0
    }
}
