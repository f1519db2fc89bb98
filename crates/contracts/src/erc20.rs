//! ERC20-style token.
//!
//! Synchronous on-chain balances with the standard transfer/approval
//! surface and events.

use std::collections::HashMap;

use oc20_chain::{EventPayload, TokenEvent, TxnCtx};
use oc20_primitives::{AccountId, TokenAmount};

use crate::{
    capability::{BalanceQuery, Burnable, Mintable, TokenMetadata},
    config::TokenConfig,
    errors::{TokenError, TokenResult},
};

/// ERC20-style token contract.
///
/// Minting and burning assume authorization is enforced by the caller, the
/// same stance the rest of this family takes for supply administration.
#[derive(Clone, Debug)]
pub struct Erc20Token {
    config: TokenConfig,
    balances: HashMap<AccountId, TokenAmount>,
    allowances: HashMap<(AccountId, AccountId), TokenAmount>,
    total_in_circulation: TokenAmount,
}

impl Erc20Token {
    pub fn new(config: TokenConfig) -> Self {
        Self {
            config,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_in_circulation: TokenAmount::ZERO,
        }
    }

    /// Remaining amount `spender` may move out of `owner`'s account.
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> TokenAmount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Approves `spender` to move up to `value` from `owner`'s account.
    pub fn approve_spend(
        &mut self,
        ctx: &mut TxnCtx,
        owner: &AccountId,
        spender: &AccountId,
        value: TokenAmount,
    ) -> TokenResult<()> {
        self.allowances.insert((*owner, *spender), value);
        ctx.emit(EventPayload::Token(TokenEvent::Approval {
            owner: *owner,
            spender: *spender,
            value,
        }));
        Ok(())
    }

    /// Moves `value` from `from` to `to` on behalf of `spender`.
    ///
    /// A spender other than the owner consumes allowance; the owner moves
    /// their own funds freely.
    pub fn transfer_from(
        &mut self,
        ctx: &mut TxnCtx,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        value: TokenAmount,
    ) -> TokenResult<()> {
        if spender != from {
            let allowed = self.allowance(from, spender);
            let remaining =
                allowed
                    .checked_sub(value)
                    .ok_or(TokenError::InsufficientAllowance {
                        owner: *from,
                        spender: *spender,
                        have: allowed,
                        need: value,
                    })?;
            self.allowances.insert((*from, *spender), remaining);
        }

        self.transfer_balances(from, to, value)?;
        ctx.emit(EventPayload::Token(TokenEvent::Transfer {
            from: *from,
            to: *to,
            value,
        }));
        Ok(())
    }

    /// Validates a transfer without applying it, for callers that must run
    /// other fallible work between checks and effects.
    pub(crate) fn check_transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        value: TokenAmount,
    ) -> TokenResult<()> {
        let from_balance = self
            .balances
            .get(from)
            .copied()
            .ok_or(TokenError::UnknownAccount(*from))?;
        from_balance
            .checked_sub(value)
            .ok_or(TokenError::InsufficientBalance {
                account: *from,
                have: from_balance,
                need: value,
            })?;
        let to_balance = self.balances.get(to).copied().unwrap_or(TokenAmount::ZERO);
        to_balance
            .checked_add(value)
            .ok_or(TokenError::AmountOverflow)?;
        Ok(())
    }

    pub(crate) fn transfer_balances(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        value: TokenAmount,
    ) -> TokenResult<()> {
        let from_balance = self
            .balances
            .get(from)
            .copied()
            .ok_or(TokenError::UnknownAccount(*from))?;
        let new_from =
            from_balance
                .checked_sub(value)
                .ok_or(TokenError::InsufficientBalance {
                    account: *from,
                    have: from_balance,
                    need: value,
                })?;
        let to_balance = self.balances.get(to).copied().unwrap_or(TokenAmount::ZERO);
        let new_to = to_balance
            .checked_add(value)
            .ok_or(TokenError::AmountOverflow)?;

        self.balances.insert(*from, new_from);
        self.balances.insert(*to, new_to);
        Ok(())
    }
}

impl TokenMetadata for Erc20Token {
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

impl BalanceQuery for Erc20Token {
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

impl Mintable for Erc20Token {
    fn mint(&mut self, ctx: &mut TxnCtx, to: &AccountId, amount: TokenAmount) -> TokenResult<()> {
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
        ctx.emit(EventPayload::Token(TokenEvent::Mint {
            to: *to,
            value: amount,
        }));
        Ok(())
    }
}

impl Burnable for Erc20Token {
    fn burn(
        &mut self,
        ctx: &mut TxnCtx,
        from: &AccountId,
        amount: TokenAmount,
    ) -> TokenResult<()> {
        let balance = self
            .balances
            .get(from)
            .copied()
            .ok_or(TokenError::UnknownAccount(*from))?;
        let new_balance =
            balance
                .checked_sub(amount)
                .ok_or(TokenError::InsufficientBalance {
                    account: *from,
                    have: balance,
                    need: amount,
                })?;
        let new_total = self
            .total_in_circulation
            .checked_sub(amount)
            .ok_or(TokenError::AmountOverflow)?;

        self.total_in_circulation = new_total;
        self.balances.insert(*from, new_balance);
        ctx.emit(EventPayload::Token(TokenEvent::Burn {
            from: *from,
            value: amount,
        }));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use oc20_chain::MemLedger;

    use super::*;

    fn acct(b: u8) -> AccountId {
        AccountId::from([b; 32])
    }

    fn token() -> Erc20Token {
        Erc20Token::new(TokenConfig::new("SomeCoin", "SOM", 9).expect("test: config"))
    }

    #[test]
    fn test_mint_burn_roundtrip() {
        let mut token = token();
        let mut ledger = MemLedger::new();
        let x = acct(1);

        ledger
            .submit(|ctx| token.mint(ctx, &x, TokenAmount::new(100)))
            .expect("test: mint");
        ledger
            .submit(|ctx| token.burn(ctx, &x, TokenAmount::new(40)))
            .expect("test: burn");

        assert_eq!(token.balance_of(&x), TokenAmount::new(60));
        assert_eq!(token.total_supply(), TokenAmount::new(60));
    }

    #[test]
    fn test_transfer_from_consumes_allowance() {
        let mut token = token();
        let mut ledger = MemLedger::new();
        let (owner, spender, dest) = (acct(1), acct(2), acct(3));

        ledger
            .submit(|ctx| token.mint(ctx, &owner, TokenAmount::new(100)))
            .expect("test: mint");
        ledger
            .submit(|ctx| token.approve_spend(ctx, &owner, &spender, TokenAmount::new(50)))
            .expect("test: approve");

        ledger
            .submit(|ctx| token.transfer_from(ctx, &spender, &owner, &dest, TokenAmount::new(30)))
            .expect("test: transfer_from");
        assert_eq!(token.allowance(&owner, &spender), TokenAmount::new(20));
        assert_eq!(token.balance_of(&dest), TokenAmount::new(30));

        let err = ledger
            .submit(|ctx| token.transfer_from(ctx, &spender, &owner, &dest, TokenAmount::new(21)))
            .expect_err("test: over allowance");
        assert!(matches!(err, TokenError::InsufficientAllowance { .. }));

        // The owner spends without any allowance.
        ledger
            .submit(|ctx| token.transfer_from(ctx, &owner, &owner, &dest, TokenAmount::new(50)))
            .expect("test: owner transfer");
        assert_eq!(token.balance_of(&owner), TokenAmount::new(20));
    }

    #[test]
    fn test_events_emitted_in_order() {
        let mut token = token();
        let mut ledger = MemLedger::new();
        let (x, y) = (acct(1), acct(2));

        ledger
            .submit(|ctx| {
                token.mint(ctx, &x, TokenAmount::new(10))?;
                token.approve_spend(ctx, &x, &y, TokenAmount::new(5))
            })
            .expect("test: batch");

        let kinds: Vec<_> = ledger
            .events()
            .iter()
            .map(|e| match e.payload() {
                EventPayload::Token(TokenEvent::Mint { .. }) => "mint",
                EventPayload::Token(TokenEvent::Approval { .. }) => "approval",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["mint", "approval"]);
    }
}
