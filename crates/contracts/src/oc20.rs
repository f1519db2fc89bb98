//! The offchain-settled token contract.
//!
//! Methods never mutate committed balances. They read the settled view,
//! stage update actions carrying the observed expectation, and emit them as
//! events; a later settlement folds the whole pending window into one proof
//! and [`Oc20Token::settle`] swaps the on-chain commitment.

use std::sync::Arc;

use oc20_chain::TxnCtx;
use oc20_primitives::{AccountId, TokenAmount};
use oc20_proof::{ProofBackend, SettlementProof};
use oc20_state::{
    CommitmentCell, OffchainLedger, ReplayState, SettlementParams, StateCommitment,
};
use parking_lot::RwLock;
use tracing::*;

use crate::{
    capability::{BalanceQuery, TokenMetadata},
    config::TokenConfig,
    errors::{SettleError, TokenError, TokenResult},
};

/// Fungible token whose balance map lives offchain.
///
/// The commitment cell is the contract's entire on-chain state; the shared
/// [`OffchainLedger`] is the host-side mirror that staging reads from and
/// settlement reconciles into.
#[derive(Debug)]
pub struct Oc20Token {
    config: TokenConfig,
    commitments: CommitmentCell,
    store: Arc<RwLock<OffchainLedger>>,
}

impl Oc20Token {
    pub fn new(config: TokenConfig, params: SettlementParams) -> Self {
        let store = OffchainLedger::new(params);
        let commitments = CommitmentCell::new(store.commitment());
        Self {
            config,
            commitments,
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Shared handle to the offchain store, e.g. for the settlement
    /// orchestration to take replay views from.
    pub fn store(&self) -> Arc<RwLock<OffchainLedger>> {
        self.store.clone()
    }

    /// The current on-chain commitment.
    pub fn commitment(&self) -> StateCommitment {
        *self.commitments.current()
    }

    /// Creates an account holding `amount` freshly minted tokens.
    ///
    /// Staged with a "no entry" expectation: if the account already exists
    /// on-chain, or another creation races for the same key, settlement
    /// drops the loser without failing this call. The settlement report is
    /// where that outcome becomes visible.
    ///
    /// The paired total-supply update targets a singleton cell, so only one
    /// creation per settlement cycle also grows the supply.
    pub fn create_account(
        &self,
        ctx: &mut TxnCtx,
        address: &AccountId,
        amount: TokenAmount,
    ) -> TokenResult<()> {
        let mut store = self.store.write();

        let supply = store.total_supply_settled().unwrap_or(TokenAmount::ZERO);
        let new_supply = supply
            .checked_add(amount)
            .ok_or(TokenError::AmountOverflow)?;

        let create = store.stage_account_create(address, amount)?;
        let supply_update = store.stage_supply_update(new_supply);
        ctx.emit_action(create);
        ctx.emit_action(supply_update);
        Ok(())
    }

    /// Stages a transfer as a coupled debit and credit in the same pending
    /// window.
    ///
    /// The balance check runs against the settled local view, which may be
    /// stale; transfers that raced are sorted out at settlement, first
    /// writer wins.
    pub fn transfer(
        &self,
        ctx: &mut TxnCtx,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> TokenResult<()> {
        let mut store = self.store.write();

        let from_balance = store
            .get_settled(from)
            .ok_or(TokenError::UnknownAccount(*from))?;
        let new_from = from_balance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                account: *from,
                have: from_balance,
                need: amount,
            })?;

        let to_balance = store.get_settled(to).unwrap_or(TokenAmount::ZERO);
        let new_to = to_balance
            .checked_add(amount)
            .ok_or(TokenError::AmountOverflow)?;

        let debit = store.stage_account_update(from, new_from)?;
        let credit = store.stage_account_update(to, new_to)?;
        ctx.emit_action(debit);
        ctx.emit_action(credit);
        Ok(())
    }

    /// The on-chain settlement entry point, the only path that ever changes
    /// the commitment.
    ///
    /// Verifies the artifact, then requires it to extend the current
    /// commitment exactly; a proof built on an older commitment lost a
    /// settlement race and must be rebuilt. Replaying an accepted proof
    /// fails the same check.
    pub fn settle<B: ProofBackend + ?Sized>(
        &mut self,
        backend: &B,
        proof: &SettlementProof,
    ) -> Result<(), SettleError> {
        backend.verify_settlement(proof)?;

        if proof.old_commitment() != self.commitments.current() {
            return Err(SettleError::StaleCommitment {
                proof_old: *proof.old_commitment(),
                current: *self.commitments.current(),
            });
        }

        let old = self.commitments.replace(*proof.new_commitment());
        info!(
            from = ?old,
            to = ?self.commitments.current(),
            consumed = ?proof.consumed_range(),
            "settled offchain state"
        );
        Ok(())
    }

    /// Adopts the replayed state behind an accepted settlement into the
    /// host-side store. Rejects states that don't match what the chain
    /// actually settled on.
    pub fn reconcile(&self, post_state: ReplayState) -> Result<(), SettleError> {
        if post_state.commitment() != *self.commitments.current() {
            return Err(SettleError::ReconcileMismatch);
        }
        self.store.write().commit_settlement(post_state);
        Ok(())
    }
}

impl TokenMetadata for Oc20Token {
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

impl BalanceQuery for Oc20Token {
    /// Settled balance; pending actions are not reflected until the next
    /// settlement is reconciled.
    fn balance_of(&self, account: &AccountId) -> TokenAmount {
        self.store
            .read()
            .get_settled(account)
            .unwrap_or(TokenAmount::ZERO)
    }

    fn total_supply(&self) -> TokenAmount {
        self.store
            .read()
            .total_supply_settled()
            .unwrap_or(TokenAmount::ZERO)
    }
}
