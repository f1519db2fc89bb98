//! Oracle request/fulfillment relay.
//!
//! Requests are emitted as events for offchain operators to pick up;
//! fulfillments come back signed by the operator key and are delivered to
//! the requesting client contract as a callback.

use k256::schnorr::{Signature, VerifyingKey, signature::Verifier};
use oc20_chain::{EventPayload, OracleEvent, OracleRequestData, TxnCtx};
use oc20_primitives::{AccountId, Buf32, TokenAmount, hash_borsh};
use tracing::*;

use crate::{
    erc677::Erc677Receiver,
    errors::{TokenError, TokenResult},
};

/// The oracle relay contract.
#[derive(Clone, Debug)]
pub struct OracleContract {
    operator_key: VerifyingKey,
    token_address: Option<AccountId>,
}

impl OracleContract {
    pub fn new(operator_key: VerifyingKey) -> Self {
        Self {
            operator_key,
            token_address: None,
        }
    }

    /// Sets the ERC677 token this oracle accepts request payments in.
    pub fn set_erc677_token(&mut self, token: AccountId) {
        self.token_address = Some(token);
    }

    pub fn token_address(&self) -> Option<&AccountId> {
        self.token_address.as_ref()
    }

    /// Publishes a request for offchain operators.
    pub fn oracle_request(
        &self,
        ctx: &mut TxnCtx,
        sender: &AccountId,
        request: OracleRequestData,
    ) -> TokenResult<()> {
        ctx.emit(EventPayload::Oracle(OracleEvent::Request {
            sender: *sender,
            request,
        }));
        Ok(())
    }

    /// Message the operator signs over fulfilled data.
    pub fn fulfillment_digest(data0: &Buf32) -> [u8; 32] {
        hash_borsh(b"oc20:oracle:fulfill", data0).into_inner()
    }

    /// Delivers fulfilled data to the requesting client, after checking the
    /// operator's signature over it. A bad signature rejects the whole
    /// transaction; the client never observes unverified data.
    pub fn fulfill_oracle_request(
        &self,
        ctx: &mut TxnCtx,
        client: &mut BasicRequestClient,
        data0: Buf32,
        signature: &Signature,
    ) -> TokenResult<()> {
        let digest = Self::fulfillment_digest(&data0);
        self.operator_key
            .verify(&digest, signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        client.on_fulfill_request(data0);
        debug!(client = %client.address(), "oracle request fulfilled");
        ctx.emit(EventPayload::Oracle(OracleEvent::Fulfilled {
            client: *client.address(),
            data0,
        }));
        Ok(())
    }
}

impl Erc677Receiver for OracleContract {
    /// Token payment carrying request data doubles as an oracle request,
    /// the transfer-and-call pattern.
    fn on_token_transfer(
        &mut self,
        ctx: &mut TxnCtx,
        from: &AccountId,
        _value: TokenAmount,
        data: &OracleRequestData,
    ) -> TokenResult<()> {
        self.oracle_request(ctx, from, *data)
    }
}

/// Minimal oracle client: remembers which oracle it talks to and the last
/// fulfilled datum.
#[derive(Clone, Debug)]
pub struct BasicRequestClient {
    address: AccountId,
    oracle_address: Option<AccountId>,
    data0: Buf32,
}

impl BasicRequestClient {
    pub fn new(address: AccountId) -> Self {
        Self {
            address,
            oracle_address: None,
            data0: Buf32::zero(),
        }
    }

    pub fn address(&self) -> &AccountId {
        &self.address
    }

    pub fn set_oracle_contract(&mut self, oracle: AccountId) {
        self.oracle_address = Some(oracle);
    }

    /// Last fulfilled datum, zero until the first fulfillment lands.
    pub fn data0(&self) -> &Buf32 {
        &self.data0
    }

    /// Routes a request through the configured oracle.
    pub fn send_oracle_request(
        &self,
        ctx: &mut TxnCtx,
        oracle: &OracleContract,
        request: OracleRequestData,
    ) -> TokenResult<()> {
        if self.oracle_address.is_none() {
            return Err(TokenError::OracleNotConfigured);
        }
        oracle.oracle_request(ctx, &self.address, request)
    }

    fn on_fulfill_request(&mut self, data0: Buf32) {
        self.data0 = data0;
    }
}
