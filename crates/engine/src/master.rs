// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Master loop: single consumer of the dispatch queue

use hookd_core::{Dispatch, DispatchReceiver, JobRegistry};
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::info;

/// Consumes the dispatch queue and sweeps jobs for completed executions.
pub struct MasterLoop {
    registry: JobRegistry,
    queue: DispatchReceiver,
    poll_interval: Duration,
}

impl MasterLoop {
    pub fn new(registry: JobRegistry, queue: DispatchReceiver, poll_interval: Duration) -> Self {
        Self {
            registry,
            queue,
            poll_interval,
        }
    }

    /// Run until the stop sentinel arrives (or every sender is gone).
    ///
    /// Each iteration handles at most one dispatch event, then sweeps every
    /// job, so completion-detection latency stays bounded by one iteration
    /// regardless of dispatch volume. The idle branch sleeps; a busy
    /// iteration loops again immediately to drain backlog.
    pub async fn run(mut self) {
        info!("master loop started");
        loop {
            let mut worked = false;
            match self.queue.try_recv() {
                Ok(Dispatch::Run { job, source }) => {
                    info!(job = %job.name, %source, "run");
                    job.start();
                    worked = true;
                }
                Ok(Dispatch::Stop) => break,
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => break,
            }

            self.sweep();

            if !worked {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
        info!("master loop stopped");
    }

    /// Collect every finished job: log its outcome, then reset it. Cleanup
    /// may immediately restart a rerun the ASAP policy coalesced.
    fn sweep(&self) {
        for job in self.registry.jobs() {
            if job.finished() {
                if let Some(outcome) = job.result() {
                    info!(job = %job.name, %outcome, "finished");
                }
                job.cleanup();
            }
        }
    }
}

#[cfg(test)]
#[path = "master_tests.rs"]
mod tests;
