// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in task-backed jobs

use async_trait::async_trait;
use hookd_core::{Activation, JobTask, TaskResult};
use std::sync::Arc;
use std::time::Instant;

/// Look up a built-in task by name (case-insensitive).
pub fn builtin(name: &str) -> Option<Arc<dyn JobTask>> {
    if name.eq_ignore_ascii_case("tick") {
        Some(Arc::new(TickTask::new()))
    } else {
        None
    }
}

/// Uptime ticker: reports seconds since it was configured. Activating it
/// binds it to the periodic hook at a 10 second interval.
pub struct TickTask {
    started: Instant,
}

impl TickTask {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for TickTask {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobTask for TickTask {
    async fn run(&self) -> TaskResult {
        Ok(format!("tick (uptime {}s)", self.started.elapsed().as_secs()))
    }

    fn activate(&self) -> Activation {
        Activation {
            periods: vec!["10s".to_string()],
            get: false,
            post: false,
        }
    }
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
