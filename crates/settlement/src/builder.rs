//! Settlement build procedure.

use oc20_proof::{ChunkProof, ChunkStatement, ProofBackend, SettlementProof};
use oc20_state::{ReplayState, SequencedAction, compute_actions_digest};
use tracing::*;

use crate::{
    errors::{SettlementError, SettlementResult},
    report::{DropReason, SettlementReport},
};

/// Result of a successful settlement build.
///
/// `post_state` is what the store adopts once the chain accepts the proof;
/// until then it is just a detached value that can be thrown away.
#[derive(Clone, Debug)]
pub struct SettlementOutcome {
    pub proof: SettlementProof,
    pub report: SettlementReport,
    pub post_state: ReplayState,
}

/// An in-progress settlement build, driven one chunk at a time.
///
/// Callers that need cancellation points between chunk proofs (the job
/// runner) drive this directly; everyone else goes through
/// [`SettlementBuilder::build`].
pub struct SettlementRun<'b, B: ProofBackend + ?Sized> {
    backend: &'b B,
    state: ReplayState,
    chunks: Vec<ChunkProof>,
    report: SettlementReport,
}

impl<B: ProofBackend + ?Sized> core::fmt::Debug for SettlementRun<'_, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SettlementRun")
            .field("watermark", &self.state.watermark())
            .field("chunks", &self.chunks.len())
            .finish_non_exhaustive()
    }
}

impl<'b, B: ProofBackend + ?Sized> SettlementRun<'b, B> {
    pub fn new(backend: &'b B, base: ReplayState) -> Self {
        Self {
            backend,
            state: base,
            chunks: Vec::new(),
            report: SettlementReport::new(),
        }
    }

    /// Replays one chunk of actions and proves the resulting transition.
    ///
    /// Each action's expectation is checked against the live replay value
    /// at application time, not at emission time. A mismatch drops the
    /// action (first writer wins) but still consumes it; replaying it later
    /// with the same stale expectation could never succeed.
    pub fn process_chunk(&mut self, actions: &[SequencedAction]) -> SettlementResult<()> {
        let limit = self.state.params().max_actions_per_proof();
        if actions.len() > limit {
            return Err(SettlementError::ChunkTooLarge {
                got: actions.len(),
                limit,
            });
        }

        let old_commitment = self.state.commitment();

        for seq_action in actions {
            let seq_no = seq_action.seq_no();
            if seq_no < self.state.watermark() {
                return Err(SettlementError::OutOfOrderAction {
                    seq_no,
                    watermark: self.state.watermark(),
                });
            }

            let action = seq_action.action();
            let live = self.state.live_value(action.target());
            if live == action.expected_old() {
                self.state.apply_new_value(action.target(), action.new_value())?;
                self.report.record_applied(seq_no);
            } else {
                debug!(
                    %seq_no,
                    expected = ?action.expected_old(),
                    ?live,
                    "dropping conflicting action"
                );
                self.report
                    .record_dropped(seq_no, DropReason::StaleExpectedValue {
                        expected: action.expected_old(),
                        live,
                    });
            }
            self.state.consume_through(seq_no);
        }

        let statement = ChunkStatement::new(
            old_commitment,
            self.state.commitment(),
            compute_actions_digest(actions),
        );
        let proof = self.backend.prove_chunk(&statement)?;
        self.chunks.push(proof);
        Ok(())
    }

    pub fn chunks_proven(&self) -> usize {
        self.chunks.len()
    }

    /// Composes the chunk proofs into the aggregate settlement artifact.
    pub fn finish(self) -> SettlementResult<SettlementOutcome> {
        if self.chunks.is_empty() {
            return Err(SettlementError::EmptyPendingWindow);
        }
        let proof = self.backend.compose(&self.chunks)?;
        debug!(
            applied = self.report.applied().len(),
            dropped = self.report.dropped().len(),
            range = ?proof.consumed_range(),
            "settlement build complete"
        );
        Ok(SettlementOutcome {
            proof,
            report: self.report,
            post_state: self.state,
        })
    }
}

/// Convenience front end that chunks the pending window by the configured
/// per-proof limit and drives a [`SettlementRun`] to completion.
#[derive(Copy, Clone, Debug)]
pub struct SettlementBuilder<'b, B: ProofBackend + ?Sized> {
    backend: &'b B,
}

impl<'b, B: ProofBackend + ?Sized> SettlementBuilder<'b, B> {
    pub fn new(backend: &'b B) -> Self {
        Self { backend }
    }

    /// Builds a settlement covering `actions` on top of `base`.
    pub fn build(
        &self,
        base: ReplayState,
        actions: &[SequencedAction],
    ) -> SettlementResult<SettlementOutcome> {
        if actions.is_empty() {
            return Err(SettlementError::EmptyPendingWindow);
        }
        let chunk_size = base.params().max_actions_per_proof();
        let mut run = SettlementRun::new(self.backend, base);
        for chunk in actions.chunks(chunk_size) {
            run.process_chunk(chunk)?;
        }
        run.finish()
    }
}
