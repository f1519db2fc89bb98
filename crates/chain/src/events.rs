//! Typed ledger events.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use oc20_primitives::{AccountId, Buf32, TokenAmount};
use oc20_state::UpdateAction;
use serde::{Deserialize, Serialize};

/// Events emitted by the synchronous token contracts.
#[derive(
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
pub enum TokenEvent {
    Transfer {
        from: AccountId,
        to: AccountId,
        value: TokenAmount,
    },
    Approval {
        owner: AccountId,
        spender: AccountId,
        value: TokenAmount,
    },
    TransferAndCall {
        from: AccountId,
        to: AccountId,
        value: TokenAmount,
        data: OracleRequestData,
    },
    Mint {
        to: AccountId,
        value: TokenAmount,
    },
    Burn {
        from: AccountId,
        value: TokenAmount,
    },
}

/// Four field-sized scalars carried by oracle requests and
/// transfer-and-call payloads.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Arbitrary,
    BorshDeserialize,
    BorshSerialize,
    Deserialize,
    Serialize,
)]
pub struct OracleRequestData {
    pub req0: Buf32,
    pub req1: Buf32,
    pub req2: Buf32,
    pub req3: Buf32,
}

impl OracleRequestData {
    pub fn new(req0: Buf32, req1: Buf32, req2: Buf32, req3: Buf32) -> Self {
        Self {
            req0,
            req1,
            req2,
            req3,
        }
    }
}

/// Events emitted by the oracle relay. External operators watch for
/// `Request` and answer with a signed fulfillment transaction.
#[derive(
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
pub enum OracleEvent {
    Request {
        sender: AccountId,
        request: OracleRequestData,
    },
    Fulfilled {
        client: AccountId,
        data0: Buf32,
    },
}

/// Any event a contract can emit.
#[derive(
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
pub enum EventPayload {
    /// A staged offchain-state update. These are what settlement consumes.
    Action(UpdateAction),
    Token(TokenEvent),
    Oracle(OracleEvent),
}

/// An event as included on the ledger.
#[derive(
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
pub struct EventRecord {
    height: u64,
    txn_index: u32,
    event_index: u32,

    /// Global action sequence number, assigned iff the payload is an
    /// [`EventPayload::Action`].
    action_seq: Option<u64>,

    payload: EventPayload,
}

impl EventRecord {
    pub(crate) fn new(
        height: u64,
        txn_index: u32,
        event_index: u32,
        action_seq: Option<u64>,
        payload: EventPayload,
    ) -> Self {
        Self {
            height,
            txn_index,
            event_index,
            action_seq,
            payload,
        }
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn txn_index(&self) -> u32 {
        self.txn_index
    }

    pub fn event_index(&self) -> u32 {
        self.event_index
    }

    pub fn action_seq(&self) -> Option<u64> {
        self.action_seq
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }
}
