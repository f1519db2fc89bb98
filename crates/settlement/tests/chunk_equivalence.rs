//! Chunk-boundary transparency tests.
//!
//! The final commitment of a settlement must depend only on the settled
//! base state and the ordered action window, never on where the chunk
//! boundaries fall. This is the key correctness property of the chunked
//! proof pipeline.

use oc20_primitives::{AccountId, TokenAmount};
use oc20_proof::{NativeBackend, ProofBackend};
use oc20_state::{OffchainLedger, SequencedAction, SettlementParams, UpdateAction};
use oc20_settlement::{SettlementBuilder, SettlementOutcome, SettlementRun};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn acct(b: u8) -> AccountId {
    AccountId::from([b; 32])
}

fn sequence(actions: Vec<UpdateAction>) -> Vec<SequencedAction> {
    actions
        .into_iter()
        .enumerate()
        .map(|(i, a)| SequencedAction::new(i as u64, a))
        .collect()
}

/// Stages a workload with creates, rewrites and a few deliberate conflicts.
fn staged_workload(store: &mut OffchainLedger, n: usize, seed: u64) -> Vec<SequencedAction> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut actions = Vec::with_capacity(n);
    for _ in 0..n {
        let key = acct(rng.gen_range(0..8u8));
        let amount = TokenAmount::new(rng.gen_range(1..1_000u64));
        let action = if rng.gen_bool(0.3) {
            // Duplicate-create style staging; later ones conflict.
            store.stage_account_create(&key, amount).expect("stage create")
        } else {
            store.stage_account_update(&key, amount).expect("stage update")
        };
        actions.push(action);
    }
    sequence(actions)
}

/// Builds with explicit chunk boundaries.
fn build_with_splits(
    store: &OffchainLedger,
    actions: &[SequencedAction],
    splits: &[usize],
) -> SettlementOutcome {
    let backend = NativeBackend::new();
    let mut run = SettlementRun::new(&backend, store.replay_view());
    let mut rest = actions;
    for len in splits {
        let (chunk, tail) = rest.split_at(*len);
        run.process_chunk(chunk).expect("process chunk");
        rest = tail;
    }
    assert!(rest.is_empty(), "splits must cover the window");
    run.finish().expect("finish")
}

#[test]
fn test_single_chunk_equals_max_chunking() {
    let mut store = OffchainLedger::new(SettlementParams::new(6, 10).expect("params"));
    let actions = staged_workload(&mut store, 10, 1);

    let one_chunk = build_with_splits(&store, &actions, &[10]);
    let five_by_two = build_with_splits(&store, &actions, &[2, 2, 2, 2, 2]);
    let uneven = build_with_splits(&store, &actions, &[1, 4, 3, 2]);

    assert_eq!(
        one_chunk.proof.new_commitment(),
        five_by_two.proof.new_commitment()
    );
    assert_eq!(
        one_chunk.proof.new_commitment(),
        uneven.proof.new_commitment()
    );
    assert_eq!(one_chunk.report, five_by_two.report);
    assert_eq!(one_chunk.report, uneven.report);
}

#[test]
fn test_builder_front_end_matches_manual_chunking() {
    let mut store = OffchainLedger::new(SettlementParams::new(6, 4).expect("params"));
    let actions = staged_workload(&mut store, 11, 7);

    let backend = NativeBackend::new();
    let auto = SettlementBuilder::new(&backend)
        .build(store.replay_view(), &actions)
        .expect("build");
    // The front end chunks as [4, 4, 3]; compare against a different split.
    let manual = build_with_splits(&store, &actions, &[1, 3, 4, 2, 1]);

    assert_eq!(auto.proof.new_commitment(), manual.proof.new_commitment());
    assert_eq!(auto.report, manual.report);
}

#[test]
fn test_settlement_roundtrip_through_store() {
    // Full loop at the state level: stage, build, verify, reconcile.
    let mut store = OffchainLedger::new(SettlementParams::new(4, 3).expect("params"));
    let x = acct(1);
    let mut staged = Vec::new();
    staged.push(store.stage_account_create(&x, TokenAmount::new(1000)).expect("stage"));
    staged.push(store.stage_supply_update(TokenAmount::new(1000)));
    let actions = sequence(staged);

    let backend = NativeBackend::new();
    let outcome = SettlementBuilder::new(&backend)
        .build(store.replay_view(), &actions)
        .expect("build");

    backend
        .verify_settlement(&outcome.proof)
        .expect("proof verifies");
    assert_eq!(outcome.proof.old_commitment(), &store.commitment());

    store.commit_settlement(outcome.post_state);
    assert_eq!(store.get_settled(&x), Some(TokenAmount::new(1000)));
    assert_eq!(store.total_supply_settled(), Some(TokenAmount::new(1000)));
    assert_eq!(&store.commitment(), outcome.proof.new_commitment());

    // The settled account now has a verifiable membership witness.
    let witness = store.witness(&x).expect("witness");
    assert!(witness.verify(&store.commitment()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// P1: for any workload and any chunk-size choice within the limit, the
    /// final commitment matches the single-pass result.
    #[test]
    fn proptest_chunk_boundaries_are_transparent(
        n in 1usize..24,
        seed in any::<u64>(),
        chunk_seed in any::<u64>(),
    ) {
        let mut store = OffchainLedger::new(SettlementParams::new(6, 24).expect("params"));
        let actions = staged_workload(&mut store, n, seed);

        let reference = build_with_splits(&store, &actions, &[n]);

        // Random split of the same window.
        let mut rng = ChaCha8Rng::seed_from_u64(chunk_seed);
        let mut splits = Vec::new();
        let mut left = n;
        while left > 0 {
            let take = rng.gen_range(1..=left.min(24));
            splits.push(take);
            left -= take;
        }
        let split_build = build_with_splits(&store, &actions, &splits);

        prop_assert_eq!(
            reference.proof.new_commitment(),
            split_build.proof.new_commitment()
        );
        prop_assert_eq!(reference.report, split_build.report);
    }
}
