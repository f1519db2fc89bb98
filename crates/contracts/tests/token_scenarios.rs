//! End-to-end scenarios for the offchain-settled token: stage through the
//! ledger, build the settlement, apply it on-chain, reconcile the store.

use oc20_chain::{ActionLogReader, MemLedger};
use oc20_contracts::{BalanceQuery, Oc20Token, SettleError, TokenConfig, TokenError, TokenMetadata};
use oc20_primitives::{AccountId, TokenAmount};
use oc20_proof::NativeBackend;
use oc20_settlement::{SettlementBuilder, SettlementReport};
use oc20_state::{SettlementParams, StateError};

fn acct(b: u8) -> AccountId {
    AccountId::from([b; 32])
}

fn new_token() -> Oc20Token {
    Oc20Token::new(
        TokenConfig::new("SomeCoin", "SOM", 9).expect("config"),
        SettlementParams::new(10, 5).expect("params"),
    )
}

/// Drives one full settlement cycle over everything currently pending.
fn settle_cycle(
    token: &mut Oc20Token,
    ledger: &MemLedger,
    backend: &NativeBackend,
) -> SettlementReport {
    let store = token.store();
    let (base, watermark) = {
        let store = store.read();
        (store.replay_view(), store.actions_consumed())
    };
    let actions = ActionLogReader::new(ledger).collect_pending(watermark);

    let outcome = SettlementBuilder::new(backend)
        .build(base, &actions)
        .expect("settlement build");
    token.settle(backend, &outcome.proof).expect("settle");
    token.reconcile(outcome.post_state).expect("reconcile");
    outcome.report
}

#[test]
fn test_token_metadata() {
    let token = new_token();
    assert_eq!(token.symbol(), "SOM");
    assert_eq!(token.name(), "SomeCoin");
    assert_eq!(token.decimals(), 9);
}

#[test]
fn test_create_and_settle() {
    // Scenario A: create an account, settle, observe balance and supply.
    let mut token = new_token();
    let mut ledger = MemLedger::new();
    let backend = NativeBackend::new();
    let x = acct(1);

    ledger
        .submit(|ctx| token.create_account(ctx, &x, TokenAmount::new(1000)))
        .expect("create");

    // Nothing is visible before settlement.
    assert_eq!(token.balance_of(&x), TokenAmount::ZERO);
    assert_eq!(token.total_supply(), TokenAmount::ZERO);

    let report = settle_cycle(&mut token, &ledger, &backend);
    assert!(report.dropped().is_empty());
    assert_eq!(token.balance_of(&x), TokenAmount::new(1000));
    assert_eq!(token.total_supply(), TokenAmount::new(1000));
}

#[test]
fn test_transfer_across_cycles() {
    // Scenario B: create and settle, transfer and settle.
    let mut token = new_token();
    let mut ledger = MemLedger::new();
    let backend = NativeBackend::new();
    let (x, y) = (acct(1), acct(2));

    ledger
        .submit(|ctx| token.create_account(ctx, &x, TokenAmount::new(1000)))
        .expect("create");
    settle_cycle(&mut token, &ledger, &backend);

    ledger.advance_block();
    ledger
        .submit(|ctx| token.transfer(ctx, &x, &y, TokenAmount::new(100)))
        .expect("transfer");
    let report = settle_cycle(&mut token, &ledger, &backend);

    assert!(report.dropped().is_empty());
    assert_eq!(token.balance_of(&x), TokenAmount::new(900));
    assert_eq!(token.balance_of(&y), TokenAmount::new(100));
    assert_eq!(token.total_supply(), TokenAmount::new(1000));
}

#[test]
fn test_duplicate_create_settles_once() {
    // Scenario C: the same account created twice in one pending window.
    // Exactly one creation takes effect; the other is consumed and dropped,
    // and the caller only learns through the report.
    let mut token = new_token();
    let mut ledger = MemLedger::new();
    let backend = NativeBackend::new();
    let x = acct(1);

    for _ in 0..2 {
        ledger
            .submit(|ctx| token.create_account(ctx, &x, TokenAmount::new(1000)))
            .expect("staging never fails on duplicates");
    }

    let report = settle_cycle(&mut token, &ledger, &backend);
    assert_eq!(token.balance_of(&x), TokenAmount::new(1000));
    assert_eq!(token.total_supply(), TokenAmount::new(1000));
    // Second create and its supply update both lost the race.
    assert_eq!(report.applied(), &[0, 1]);
    assert_eq!(report.dropped().len(), 2);
}

#[test]
fn test_stale_transfers_drop_in_order() {
    // Scenario D: four transfers staged against the same settled balance.
    // Each is individually viable at staging time; at settlement they apply
    // in emission order and every later one fails its expectation.
    let mut token = new_token();
    let mut ledger = MemLedger::new();
    let backend = NativeBackend::new();
    let (x, y) = (acct(1), acct(2));

    ledger
        .submit(|ctx| token.create_account(ctx, &x, TokenAmount::new(1000)))
        .expect("create");
    settle_cycle(&mut token, &ledger, &backend);

    ledger.advance_block();
    for _ in 0..4 {
        ledger
            .submit(|ctx| token.transfer(ctx, &x, &y, TokenAmount::new(400)))
            .expect("each transfer is viable against the settled view");
    }

    let report = settle_cycle(&mut token, &ledger, &backend);

    // First transfer's debit and credit applied; the remaining three pairs
    // dropped without corrupting anything.
    assert_eq!(token.balance_of(&x), TokenAmount::new(600));
    assert_eq!(token.balance_of(&y), TokenAmount::new(400));
    assert_eq!(token.total_supply(), TokenAmount::new(1000));
    assert_eq!(report.applied().len(), 2);
    assert_eq!(report.dropped().len(), 6);
}

#[test]
fn test_settlement_proof_is_single_use() {
    // P3: the same proof cannot be applied twice.
    let mut token = new_token();
    let mut ledger = MemLedger::new();
    let backend = NativeBackend::new();

    ledger
        .submit(|ctx| token.create_account(ctx, &acct(1), TokenAmount::new(10)))
        .expect("create");

    let store = token.store();
    let base = store.read().replay_view();
    let actions = ActionLogReader::new(&ledger).collect_pending(0);
    let outcome = SettlementBuilder::new(&backend)
        .build(base, &actions)
        .expect("build");

    token.settle(&backend, &outcome.proof).expect("first apply");
    let err = token
        .settle(&backend, &outcome.proof)
        .expect_err("second apply must fail");
    assert!(matches!(err, SettleError::StaleCommitment { .. }));
}

#[test]
fn test_racing_settlements_single_winner() {
    // Two settlements built from the same base commitment; only the first
    // one lands, the loser must rebuild from the new commitment.
    let mut token = new_token();
    let mut ledger = MemLedger::new();
    let backend = NativeBackend::new();

    ledger
        .submit(|ctx| token.create_account(ctx, &acct(1), TokenAmount::new(10)))
        .expect("create");

    let store = token.store();
    let actions = ActionLogReader::new(&ledger).collect_pending(0);
    let outcome_a = SettlementBuilder::new(&backend)
        .build(store.read().replay_view(), &actions)
        .expect("build a");
    let outcome_b = SettlementBuilder::new(&backend)
        .build(store.read().replay_view(), &actions)
        .expect("build b");

    token.settle(&backend, &outcome_a.proof).expect("winner");
    token.reconcile(outcome_a.post_state).expect("reconcile");
    let err = token
        .settle(&backend, &outcome_b.proof)
        .expect_err("loser fails the precondition");
    assert!(matches!(err, SettleError::StaleCommitment { .. }));
}

#[test]
fn test_insufficient_balance_fails_at_staging() {
    let mut token = new_token();
    let mut ledger = MemLedger::new();
    let backend = NativeBackend::new();
    let (x, y) = (acct(1), acct(2));

    ledger
        .submit(|ctx| token.create_account(ctx, &x, TokenAmount::new(100)))
        .expect("create");
    settle_cycle(&mut token, &ledger, &backend);

    let events_before = ledger.events().len();
    let err = ledger
        .submit(|ctx| token.transfer(ctx, &x, &y, TokenAmount::new(101)))
        .expect_err("overdraw fails synchronously");
    assert!(matches!(err, TokenError::InsufficientBalance { .. }));
    // The rejected transaction emitted nothing.
    assert_eq!(ledger.events().len(), events_before);
}

#[test]
fn test_transfer_from_unknown_account_fails() {
    let token = new_token();
    let mut ledger = MemLedger::new();
    let err = ledger
        .submit(|ctx| token.transfer(ctx, &acct(1), &acct(2), TokenAmount::new(1)))
        .expect_err("unknown sender");
    assert!(matches!(err, TokenError::UnknownAccount(_)));
}

#[test]
fn test_capacity_boundary() {
    // P4: the 2^log_total_capacity + 1'th distinct key fails
    // deterministically at staging time.
    let mut token = Oc20Token::new(
        TokenConfig::new("SomeCoin", "SOM", 9).expect("config"),
        SettlementParams::new(2, 5).expect("params"),
    );
    let mut ledger = MemLedger::new();
    let backend = NativeBackend::new();

    for i in 0..4u8 {
        ledger
            .submit(|ctx| token.create_account(ctx, &acct(i), TokenAmount::new(1)))
            .expect("within capacity");
    }
    let err = ledger
        .submit(|ctx| token.create_account(ctx, &acct(4), TokenAmount::new(1)))
        .expect_err("fifth distinct key must fail");
    assert!(matches!(
        err,
        TokenError::State(StateError::CapacityExceeded { capacity: 4 })
    ));

    // The full map still settles.
    let report = settle_cycle(&mut token, &ledger, &backend);
    assert_eq!(token.total_supply(), TokenAmount::new(1));
    assert_eq!(report.applied().len() + report.dropped().len(), 8);
}

#[test]
fn test_settlement_report_accounts_for_every_action() {
    let mut token = new_token();
    let mut ledger = MemLedger::new();
    let backend = NativeBackend::new();

    for i in 0..3u8 {
        ledger
            .submit(|ctx| token.create_account(ctx, &acct(i), TokenAmount::new(100)))
            .expect("create");
    }
    let emitted = ledger.actions_emitted();
    let report = settle_cycle(&mut token, &ledger, &backend);
    assert_eq!(report.total_consumed() as u64, emitted);

    // Later cycles start past the consumed window.
    let store = token.store();
    assert_eq!(store.read().actions_consumed(), emitted);
}
