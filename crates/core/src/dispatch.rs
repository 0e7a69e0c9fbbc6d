// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch queue events shared by hooks and the engine

use crate::job::Job;
use std::sync::Arc;
use tokio::sync::mpsc;

/// An event on the dispatch queue.
#[derive(Clone)]
pub enum Dispatch {
    /// Run this job now; `source` labels the trigger that fired it.
    Run { job: Arc<Job>, source: String },
    /// Sentinel: the master loop exits when it dequeues this.
    Stop,
}

impl Dispatch {
    pub fn run(job: Arc<Job>, source: impl Into<String>) -> Self {
        Dispatch::Run {
            job,
            source: source.into(),
        }
    }
}

pub type DispatchSender = mpsc::UnboundedSender<Dispatch>;
pub type DispatchReceiver = mpsc::UnboundedReceiver<Dispatch>;

/// Create the unbounded FIFO dispatch queue.
pub fn dispatch_queue() -> (DispatchSender, DispatchReceiver) {
    mpsc::unbounded_channel()
}
