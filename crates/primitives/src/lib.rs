//! Collection of generic internal data types that are used widely.

#[macro_use]
mod macros;

pub mod amount;
pub mod buf;
pub mod hash;
pub mod id;

pub use amount::TokenAmount;
pub use buf::Buf32;
pub use hash::{hash_borsh, sha256, sha256_tagged};
pub use id::AccountId;
