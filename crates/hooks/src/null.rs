// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The base hook: no trigger source, never started

use crate::Hook;
use hookd_core::{ConfigError, DispatchSender, JobRegistry, TriggerConfig};

/// A hook with no subscriptions. Always empty, so the engine never starts
/// it; every operation is a no-op.
#[derive(Debug, Default)]
pub struct NullHook;

impl Hook for NullHook {
    fn name(&self) -> &'static str {
        "null"
    }

    fn configure(
        &mut self,
        _registry: &JobRegistry,
        _triggers: &TriggerConfig,
    ) -> Result<(), ConfigError> {
        Ok(())
    }

    fn empty(&self) -> bool {
        true
    }

    fn start(&mut self, _queue: DispatchSender) {}

    fn stop(&self) {}

    fn running(&self) -> bool {
        false
    }
}
