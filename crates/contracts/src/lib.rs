//! The contract family: the offchain-settled Oc20 token, the simpler
//! synchronous tokens (basic, ERC20- and ERC677-style), and the oracle
//! request/fulfillment relay.
//!
//! Contracts are host-side models of on-chain programs: state transitions
//! are all-or-nothing per method call and every externally visible effect
//! goes through the ledger's event stream.

mod basic;
mod capability;
mod config;
mod erc20;
mod erc677;
mod errors;
mod oc20;
mod oracle;

pub use basic::BasicToken;
pub use capability::{BalanceQuery, Burnable, Mintable, TokenMetadata};
pub use config::{MAX_DECIMALS, MAX_SYMBOL_LEN, TokenConfig};
pub use erc20::Erc20Token;
pub use erc677::{Erc677Receiver, Erc677Token};
pub use errors::{ConfigError, SettleError, TokenError, TokenResult};
pub use oc20::Oc20Token;
pub use oracle::{BasicRequestClient, OracleContract};
