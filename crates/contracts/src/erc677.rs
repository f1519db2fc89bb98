//! ERC677-style token: ERC20 plus transfer-and-call.

use oc20_chain::{EventPayload, OracleRequestData, TokenEvent, TxnCtx};
use oc20_primitives::{AccountId, TokenAmount};

use crate::{
    capability::{BalanceQuery, Burnable, Mintable, TokenMetadata},
    config::TokenConfig,
    erc20::Erc20Token,
    errors::TokenResult,
};

/// Receiver hook for transfer-and-call. Contracts that accept ERC677
/// payments implement this.
pub trait Erc677Receiver {
    fn on_token_transfer(
        &mut self,
        ctx: &mut TxnCtx,
        from: &AccountId,
        value: TokenAmount,
        data: &OracleRequestData,
    ) -> TokenResult<()>;
}

/// ERC677-style token. Everything ERC20 does, plus [`Self::transfer_and_call`].
#[derive(Clone, Debug)]
pub struct Erc677Token {
    inner: Erc20Token,
}

impl Erc677Token {
    pub fn new(config: TokenConfig) -> Self {
        Self {
            inner: Erc20Token::new(config),
        }
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> TokenAmount {
        self.inner.allowance(owner, spender)
    }

    pub fn approve_spend(
        &mut self,
        ctx: &mut TxnCtx,
        owner: &AccountId,
        spender: &AccountId,
        value: TokenAmount,
    ) -> TokenResult<()> {
        self.inner.approve_spend(ctx, owner, spender, value)
    }

    pub fn transfer_from(
        &mut self,
        ctx: &mut TxnCtx,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        value: TokenAmount,
    ) -> TokenResult<()> {
        self.inner.transfer_from(ctx, spender, from, to, value)
    }

    /// Transfers `value` to the receiving contract's account and hands the
    /// data payload to its hook, in one transaction.
    ///
    /// Checks run before the hook so a failing receiver aborts the whole
    /// call with no balances moved.
    pub fn transfer_and_call<R: Erc677Receiver + ?Sized>(
        &mut self,
        ctx: &mut TxnCtx,
        from: &AccountId,
        to: &AccountId,
        value: TokenAmount,
        data: OracleRequestData,
        receiver: &mut R,
    ) -> TokenResult<()> {
        self.inner.check_transfer(from, to, value)?;

        ctx.emit(EventPayload::Token(TokenEvent::Transfer {
            from: *from,
            to: *to,
            value,
        }));
        ctx.emit(EventPayload::Token(TokenEvent::TransferAndCall {
            from: *from,
            to: *to,
            value,
            data,
        }));
        receiver.on_token_transfer(ctx, from, value, &data)?;

        self.inner.transfer_balances(from, to, value)
    }
}

impl TokenMetadata for Erc677Token {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn symbol(&self) -> &str {
        self.inner.symbol()
    }

    fn decimals(&self) -> u8 {
        self.inner.decimals()
    }
}

impl BalanceQuery for Erc677Token {
    fn balance_of(&self, account: &AccountId) -> TokenAmount {
        self.inner.balance_of(account)
    }

    fn total_supply(&self) -> TokenAmount {
        self.inner.total_supply()
    }
}

impl Mintable for Erc677Token {
    fn mint(&mut self, ctx: &mut TxnCtx, to: &AccountId, amount: TokenAmount) -> TokenResult<()> {
        self.inner.mint(ctx, to, amount)
    }
}

impl Burnable for Erc677Token {
    fn burn(
        &mut self,
        ctx: &mut TxnCtx,
        from: &AccountId,
        amount: TokenAmount,
    ) -> TokenResult<()> {
        self.inner.burn(ctx, from, amount)
    }
}

#[cfg(test)]
mod tests {
    use k256::schnorr::SigningKey;
    use oc20_chain::{MemLedger, OracleEvent};
    use oc20_primitives::Buf32;
    use rand::rngs::OsRng;

    use super::*;
    use crate::{errors::TokenError, oracle::OracleContract};

    fn acct(b: u8) -> AccountId {
        AccountId::from([b; 32])
    }

    fn setup() -> (Erc677Token, OracleContract) {
        let sk = SigningKey::random(&mut OsRng);
        let token = Erc677Token::new(TokenConfig::new("SomeCoin", "SOM", 9).expect("test: config"));
        (token, OracleContract::new(sk.verifying_key().to_owned()))
    }

    #[test]
    fn test_transfer_and_call_pays_and_requests() {
        let (mut token, mut oracle) = setup();
        let mut ledger = MemLedger::new();
        let (payer, oracle_acct) = (acct(1), acct(9));

        ledger
            .submit(|ctx| token.mint(ctx, &payer, TokenAmount::new(100)))
            .expect("test: mint");

        let data = OracleRequestData::new(
            Buf32::from([1u8; 32]),
            Buf32::zero(),
            Buf32::zero(),
            Buf32::zero(),
        );
        ledger
            .submit(|ctx| {
                token.transfer_and_call(
                    ctx,
                    &payer,
                    &oracle_acct,
                    TokenAmount::new(10),
                    data,
                    &mut oracle,
                )
            })
            .expect("test: transfer_and_call");

        assert_eq!(token.balance_of(&payer), TokenAmount::new(90));
        assert_eq!(token.balance_of(&oracle_acct), TokenAmount::new(10));

        // Transfer, then TransferAndCall, then the receiver's own request.
        let kinds: Vec<_> = ledger
            .events()
            .iter()
            .skip(1)
            .map(|e| match e.payload() {
                EventPayload::Token(TokenEvent::Transfer { .. }) => "transfer",
                EventPayload::Token(TokenEvent::TransferAndCall { .. }) => "transfer_and_call",
                EventPayload::Oracle(OracleEvent::Request { sender, .. }) if *sender == payer => {
                    "request"
                }
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["transfer", "transfer_and_call", "request"]);
    }

    #[test]
    fn test_transfer_and_call_aborts_cleanly_on_overdraw() {
        let (mut token, mut oracle) = setup();
        let mut ledger = MemLedger::new();
        let (payer, oracle_acct) = (acct(1), acct(9));

        ledger
            .submit(|ctx| token.mint(ctx, &payer, TokenAmount::new(5)))
            .expect("test: mint");
        let events_before = ledger.events().len();

        let err = ledger
            .submit(|ctx| {
                token.transfer_and_call(
                    ctx,
                    &payer,
                    &oracle_acct,
                    TokenAmount::new(10),
                    OracleRequestData::default(),
                    &mut oracle,
                )
            })
            .expect_err("test: overdraw");
        assert!(matches!(err, TokenError::InsufficientBalance { .. }));
        assert_eq!(token.balance_of(&payer), TokenAmount::new(5));
        assert_eq!(ledger.events().len(), events_before);
    }
}
