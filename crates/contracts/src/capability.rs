//! Token capability traits.
//!
//! Each contract kind implements exactly the capabilities it supports;
//! there are no optional methods resolved at runtime.

use oc20_chain::TxnCtx;
use oc20_primitives::{AccountId, TokenAmount};

use crate::errors::TokenResult;

/// Static token metadata.
pub trait TokenMetadata {
    fn name(&self) -> &str;
    fn symbol(&self) -> &str;
    fn decimals(&self) -> u8;
}

/// Read side of a fungible token. Missing accounts read as zero.
pub trait BalanceQuery {
    fn balance_of(&self, account: &AccountId) -> TokenAmount;
    fn total_supply(&self) -> TokenAmount;
}

/// Supply expansion. Authorization is the implementing contract's concern.
pub trait Mintable {
    fn mint(&mut self, ctx: &mut TxnCtx, to: &AccountId, amount: TokenAmount) -> TokenResult<()>;
}

/// Supply reduction.
pub trait Burnable {
    fn burn(&mut self, ctx: &mut TxnCtx, from: &AccountId, amount: TokenAmount)
    -> TokenResult<()>;
}
