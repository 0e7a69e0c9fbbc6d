// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process job tasks and their default trigger bindings

use async_trait::async_trait;

/// Outcome of a task run. `Err` is data, not control flow: it is stored as
/// the job result, never escalated.
pub type TaskResult = Result<String, String>;

/// Default trigger bindings a task may request for its job. Applied exactly
/// once, and only when the job is explicitly activated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activation {
    /// Period specs for the periodic hook (e.g. "10s").
    pub periods: Vec<String>,
    /// Bind GET /<job-name> on the webhook hook.
    pub get: bool,
    /// Bind POST /<job-name> on the webhook hook.
    pub post: bool,
}

impl Activation {
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() && !self.get && !self.post
    }
}

/// An in-process alternative to spawning a command.
#[async_trait]
pub trait JobTask: Send + Sync {
    /// Execute the task; the returned value becomes the job result.
    async fn run(&self) -> TaskResult;

    /// Trigger bindings applied when the job is explicitly activated.
    fn activate(&self) -> Activation {
        Activation::default()
    }
}
