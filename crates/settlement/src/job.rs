//! Settlement job runner.
//!
//! Proof construction is long-running and CPU-bound, so a settlement build
//! runs on the blocking pool as an awaitable, cancellable job. Cancellation
//! is cooperative between chunk proofs; abandoning a job at any point loses
//! nothing but the work, since the build has no side effects.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use oc20_proof::ProofBackend;
use oc20_state::{ReplayState, SequencedAction};
use serde::Serialize;
use tokio::sync::watch;
use tracing::*;

use crate::{
    builder::{SettlementOutcome, SettlementRun},
    errors::{SettlementError, SettlementResult},
};

/// Observable state of a settlement job.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum JobStatus {
    Running {
        chunks_done: usize,
        chunks_total: usize,
    },
    Finished,
    Cancelled,
    Failed,
}

/// Entry point for running settlement builds as background jobs.
#[derive(Debug)]
pub struct SettlementJob;

impl SettlementJob {
    /// Spawns a settlement build over `actions` on top of `base`.
    ///
    /// The handle is the only way to observe or influence the job; dropping
    /// it detaches the build, which is harmless.
    pub fn spawn<B: ProofBackend + 'static>(
        backend: Arc<B>,
        base: ReplayState,
        actions: Vec<SequencedAction>,
    ) -> SettlementJobHandle {
        let chunk_size = base.params().max_actions_per_proof();
        let chunks_total = actions.len().div_ceil(chunk_size);

        let cancel = Arc::new(AtomicBool::new(false));
        let (status_tx, status_rx) = watch::channel(JobStatus::Running {
            chunks_done: 0,
            chunks_total,
        });

        let cancel_flag = cancel.clone();
        let join = tokio::task::spawn_blocking(move || {
            let result = run_build(&*backend, base, &actions, &cancel_flag, &status_tx);
            let final_status = match &result {
                Ok(_) => JobStatus::Finished,
                Err(SettlementError::Cancelled) => JobStatus::Cancelled,
                Err(_) => JobStatus::Failed,
            };
            let _ = status_tx.send(final_status);
            result
        });

        SettlementJobHandle {
            join,
            cancel,
            status_rx,
        }
    }
}

fn run_build<B: ProofBackend + ?Sized>(
    backend: &B,
    base: ReplayState,
    actions: &[SequencedAction],
    cancel: &AtomicBool,
    status_tx: &watch::Sender<JobStatus>,
) -> SettlementResult<SettlementOutcome> {
    if actions.is_empty() {
        return Err(SettlementError::EmptyPendingWindow);
    }

    let chunk_size = base.params().max_actions_per_proof();
    let chunks_total = actions.len().div_ceil(chunk_size);
    info!(actions = actions.len(), chunks_total, "starting settlement build");

    let mut run = SettlementRun::new(backend, base);
    for chunk in actions.chunks(chunk_size) {
        if cancel.load(Ordering::Relaxed) {
            info!(
                chunks_done = run.chunks_proven(),
                "settlement build cancelled"
            );
            return Err(SettlementError::Cancelled);
        }
        run.process_chunk(chunk)?;
        let _ = status_tx.send(JobStatus::Running {
            chunks_done: run.chunks_proven(),
            chunks_total,
        });
    }

    run.finish()
}

/// Handle to an in-flight settlement job.
#[derive(Debug)]
pub struct SettlementJobHandle {
    join: tokio::task::JoinHandle<SettlementResult<SettlementOutcome>>,
    cancel: Arc<AtomicBool>,
    status_rx: watch::Receiver<JobStatus>,
}

impl SettlementJobHandle {
    /// Requests cooperative cancellation. The job stops before its next
    /// chunk proof; an already-finished job is unaffected.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Latest observed job status.
    pub fn status(&self) -> JobStatus {
        *self.status_rx.borrow()
    }

    /// Subscribes to status updates.
    pub fn status_receiver(&self) -> watch::Receiver<JobStatus> {
        self.status_rx.clone()
    }

    /// Waits for the job to complete and returns its result.
    pub async fn join(self) -> SettlementResult<SettlementOutcome> {
        self.join.await.map_err(|_| SettlementError::TaskFailed)?
    }
}
