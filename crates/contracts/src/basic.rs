//! Basic token with signature-gated minting.
//!
//! Simplest member of the family: synchronous on-chain balances, an admin
//! key that must sign every mint, and plain sends.

use std::collections::HashMap;

use k256::schnorr::{Signature, VerifyingKey, signature::Verifier};
use oc20_chain::{EventPayload, TokenEvent, TxnCtx};
use oc20_primitives::{AccountId, TokenAmount, hash_borsh};
use tracing::*;

use crate::{
    capability::{BalanceQuery, TokenMetadata},
    config::TokenConfig,
    errors::{TokenError, TokenResult},
};

/// Synchronous-state token whose supply can only grow with the admin's
/// signature.
#[derive(Clone, Debug)]
pub struct BasicToken {
    config: TokenConfig,
    admin_key: VerifyingKey,
    balances: HashMap<AccountId, TokenAmount>,
    total_in_circulation: TokenAmount,
}

impl BasicToken {
    pub fn new(config: TokenConfig, admin_key: VerifyingKey) -> Self {
        Self {
            config,
            admin_key,
            balances: HashMap::new(),
            total_in_circulation: TokenAmount::ZERO,
        }
    }

    /// Message the admin signs to authorize a mint.
    pub fn mint_authorization_digest(to: &AccountId, amount: TokenAmount) -> [u8; 32] {
        hash_borsh(b"oc20:basic:mint", &(to, amount)).into_inner()
    }

    /// Mints `amount` to `to`, authorized by an admin signature over
    /// [`Self::mint_authorization_digest`].
    pub fn mint(
        &mut self,
        ctx: &mut TxnCtx,
        to: &AccountId,
        amount: TokenAmount,
        admin_signature: &Signature,
    ) -> TokenResult<()> {
        let digest = Self::mint_authorization_digest(to, amount);
        self.admin_key
            .verify(&digest, admin_signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let new_total = self
            .total_in_circulation
            .checked_add(amount)
            .ok_or(TokenError::AmountOverflow)?;
        let balance = self.balances.get(to).copied().unwrap_or(TokenAmount::ZERO);
        let new_balance = balance
            .checked_add(amount)
            .ok_or(TokenError::AmountOverflow)?;

        self.total_in_circulation = new_total;
        self.balances.insert(*to, new_balance);
        debug!(%to, %amount, "minted");
        ctx.emit(EventPayload::Token(TokenEvent::Mint {
            to: *to,
            value: amount,
        }));
        Ok(())
    }

    /// Moves tokens between accounts.
    pub fn send_tokens(
        &mut self,
        ctx: &mut TxnCtx,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> TokenResult<()> {
        let from_balance = self
            .balances
            .get(from)
            .copied()
            .ok_or(TokenError::UnknownAccount(*from))?;
        let new_from = from_balance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                account: *from,
                have: from_balance,
                need: amount,
            })?;
        let to_balance = self.balances.get(to).copied().unwrap_or(TokenAmount::ZERO);
        let new_to = to_balance
            .checked_add(amount)
            .ok_or(TokenError::AmountOverflow)?;

        self.balances.insert(*from, new_from);
        self.balances.insert(*to, new_to);
        ctx.emit(EventPayload::Token(TokenEvent::Transfer {
            from: *from,
            to: *to,
            value: amount,
        }));
        Ok(())
    }
}

impl TokenMetadata for BasicToken {
    fn name(&self) -> &str {
        self.config.name()
    }

    fn symbol(&self) -> &str {
        self.config.symbol()
    }

    fn decimals(&self) -> u8 {
        self.config.decimals()
    }
}

impl BalanceQuery for BasicToken {
    fn balance_of(&self, account: &AccountId) -> TokenAmount {
        self.balances
            .get(account)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    fn total_supply(&self) -> TokenAmount {
        self.total_in_circulation
    }
}
