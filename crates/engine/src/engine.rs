// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine: owns the job registry and the configured hooks

use crate::master::MasterLoop;
use hookd_core::{dispatch_queue, ConfigError, Dispatch, JobRegistry, TriggerConfig};
use hookd_hooks::Hook;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("master loop task failed: {0}")]
    MasterJoin(#[from] tokio::task::JoinError),
}

/// Owns the job registry and the list of configured hooks. Constructed once
/// at startup and driven to completion by [`Engine::run`]; there is no
/// ambient global state anywhere.
pub struct Engine {
    registry: JobRegistry,
    hooks: Vec<Box<dyn Hook>>,
    poll_interval: Duration,
}

impl Engine {
    pub fn new(registry: JobRegistry, hooks: Vec<Box<dyn Hook>>, poll_interval: Duration) -> Self {
        Self {
            registry,
            hooks,
            poll_interval,
        }
    }

    /// Configure every hook against the registry. Fail-fast: an error here
    /// means nothing has been started.
    pub fn configure(&mut self, triggers: &TriggerConfig) -> Result<(), EngineError> {
        for hook in &mut self.hooks {
            hook.configure(&self.registry, triggers)?;
        }
        Ok(())
    }

    /// Run the engine until the shutdown future resolves.
    ///
    /// Starts the master loop, then every non-empty hook. If no hook
    /// started there is nothing to wait for and the engine returns at once.
    /// On shutdown: stop every running hook, push the stop sentinel, and
    /// wait for the master loop to exit. In-flight job executions are not
    /// awaited, so the process may exit while one is still running.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> Result<(), EngineError> {
        let (tx, rx) = dispatch_queue();
        let master = tokio::spawn(
            MasterLoop::new(self.registry.clone(), rx, self.poll_interval).run(),
        );

        let mut started = 0usize;
        for hook in &mut self.hooks {
            if hook.empty() {
                debug!(hook = hook.name(), "no subscriptions, not starting");
            } else {
                info!(hook = hook.name(), "starting hook");
                hook.start(tx.clone());
                started += 1;
            }
        }

        if started == 0 {
            warn!("no hooks started");
            let _ = tx.send(Dispatch::Stop);
            master.await?;
            return Ok(());
        }

        shutdown.await;

        info!("shutting down");
        for hook in &self.hooks {
            if hook.running() {
                info!(hook = hook.name(), "stopping hook");
                hook.stop();
            }
        }
        let _ = tx.send(Dispatch::Stop);
        master.await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
