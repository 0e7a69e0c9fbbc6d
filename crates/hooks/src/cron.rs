// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic trigger: fires subscribed jobs on fixed intervals

use crate::Hook;
use hookd_core::{
    parse_period, ConfigError, Dispatch, DispatchSender, Job, JobRegistry, TriggerConfig,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info};

/// One periodic subscription.
struct CronEntry {
    job: Arc<Job>,
    period: Duration,
    last_fired: Option<Instant>,
}

impl CronEntry {
    /// When this entry should fire next. A never-fired entry is due
    /// immediately.
    fn next_fire(&self, now: Instant) -> Instant {
        match self.last_fired {
            Some(at) => at + self.period,
            None => now,
        }
    }

    fn due(&self, now: Instant) -> bool {
        self.next_fire(now) <= now
    }
}

/// Fires subscribed jobs on their configured periods.
///
/// The background task sleeps until the earliest next-fire time across all
/// subscriptions; a stop request wakes it early. Every subscription that is
/// due at wake-up fires in the same cycle, each exactly once.
pub struct CronHook {
    entries: Vec<CronEntry>,
    stop: watch::Sender<bool>,
    running: Arc<AtomicBool>,
}

impl CronHook {
    pub fn new() -> Self {
        let (stop, _) = watch::channel(false);
        Self {
            entries: Vec::new(),
            stop,
            running: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for CronHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for CronHook {
    fn name(&self) -> &'static str {
        "cron"
    }

    fn configure(
        &mut self,
        registry: &JobRegistry,
        triggers: &TriggerConfig,
    ) -> Result<(), ConfigError> {
        for (name, spec) in &triggers.cron {
            let job = registry
                .get(name)
                .ok_or_else(|| ConfigError::UnknownJob(name.clone()))?;
            let period = parse_period(spec)?;
            self.entries.push(CronEntry {
                job,
                period,
                last_fired: None,
            });
        }
        Ok(())
    }

    fn empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn start(&mut self, queue: DispatchSender) {
        let mut entries: Vec<CronEntry> = self
            .entries
            .iter()
            .map(|e| CronEntry {
                job: Arc::clone(&e.job),
                period: e.period,
                last_fired: None,
            })
            .collect();
        let mut stop = self.stop.subscribe();
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::SeqCst);

        let names: Vec<&str> = entries.iter().map(|e| e.job.name.as_str()).collect();
        info!(jobs = ?names, "cron hook started");

        tokio::spawn(async move {
            'run: loop {
                let now = Instant::now();
                let deadline = entries
                    .iter()
                    .map(|e| e.next_fire(now))
                    .min()
                    .unwrap_or(now);
                if deadline > now {
                    tokio::select! {
                        _ = tokio::time::sleep_until(deadline.into()) => {}
                        changed = stop.changed() => {
                            if changed.is_err() || *stop.borrow() {
                                break 'run;
                            }
                        }
                    }
                } else if *stop.borrow() {
                    break 'run;
                }

                let now = Instant::now();
                for entry in entries.iter_mut() {
                    if entry.due(now) {
                        debug!(job = %entry.job.name, "period elapsed");
                        if queue
                            .send(Dispatch::run(Arc::clone(&entry.job), "cron"))
                            .is_err()
                        {
                            break 'run;
                        }
                        entry.last_fired = Some(now);
                    }
                }
            }
            running.store(false, Ordering::SeqCst);
            info!("cron hook stopped");
        });
    }

    fn stop(&self) {
        info!("stopping cron hook");
        let _ = self.stop.send(true);
    }

    fn running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
