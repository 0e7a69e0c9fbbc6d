// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration model and registry assembly
//!
//! Everything here runs before any hook starts. All errors are fatal:
//! configuration either applies completely or the process exits nonzero
//! without starting anything.

use crate::identity::{resolve_group, resolve_user, IdentityError};
use crate::job::{Job, JobCommand, RunPolicy};
use crate::registry::{JobRegistry, RegistryBuilder};
use crate::task::JobTask;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate job: {0}")]
    DuplicateJob(String),
    #[error("unknown job: {0}")]
    UnknownJob(String),
    #[error("job {0} has an empty command")]
    EmptyCommand(String),
    #[error("invalid period spec: {0}")]
    InvalidPeriod(String),
    #[error("unknown built-in task: {0}")]
    UnknownTask(String),
    #[error("job {0} has no task to activate")]
    NotActivatable(String),
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// A named job definition from the command line or an embedded task.
pub struct JobSpec {
    pub name: String,
    pub command: JobCommand,
}

impl JobSpec {
    /// Job backed by an executable argv. A single-token argv is
    /// whitespace-split so `-j ECHO 'echo hi'` and `-j ECHO echo hi`
    /// configure the same job (shell quoting inside the token is not
    /// preserved).
    pub fn exec(name: impl Into<String>, argv: Vec<String>) -> Self {
        let argv = match argv.as_slice() {
            [single] if single.contains(char::is_whitespace) => single
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            _ => argv,
        };
        Self {
            name: name.into(),
            command: JobCommand::Exec(argv),
        }
    }

    /// Job backed by an in-process task.
    pub fn task(name: impl Into<String>, task: Arc<dyn JobTask>) -> Self {
        Self {
            name: name.into(),
            command: JobCommand::Task(task),
        }
    }
}

/// Trigger source configuration consumed by each hook's `configure`.
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// (job name, period spec) subscriptions for the periodic hook.
    pub cron: Vec<(String, String)>,
    /// Job names bound to GET /<name>.
    pub http_get: Vec<String>,
    /// Job names bound to POST /<name>.
    pub http_post: Vec<String>,
    pub http_address: String,
    pub http_port: u16,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            cron: Vec::new(),
            http_get: Vec::new(),
            http_post: Vec::new(),
            http_address: "0.0.0.0".to_string(),
            http_port: 5152,
        }
    }
}

/// Full engine configuration assembled by the CLI.
pub struct Config {
    pub jobs: Vec<JobSpec>,
    /// (job name, policy string); unknown policy strings keep the default.
    pub policies: Vec<(String, String)>,
    /// (job name, user name-or-uid).
    pub users: Vec<(String, String)>,
    /// (job name, group name-or-gid).
    pub groups: Vec<(String, String)>,
    /// Job names whose task's default bindings should be applied.
    pub activate: Vec<String>,
    pub triggers: TriggerConfig,
    /// Master loop sleep when a poll finds no work.
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            policies: Vec::new(),
            users: Vec::new(),
            groups: Vec::new(),
            activate: Vec::new(),
            triggers: TriggerConfig::default(),
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl Config {
    /// Build the frozen job registry and fold activations into the trigger
    /// config. Consumes the job specs; call once.
    pub fn build_registry(&mut self) -> Result<JobRegistry, ConfigError> {
        let mut builder = RegistryBuilder::default();
        for spec in self.jobs.drain(..) {
            if let JobCommand::Exec(argv) = &spec.command {
                if argv.is_empty() {
                    return Err(ConfigError::EmptyCommand(spec.name));
                }
            }
            builder.insert(Job::new(spec.name, spec.command))?;
        }

        for (name, policy) in &self.policies {
            let job = builder
                .get_mut(name)
                .ok_or_else(|| ConfigError::UnknownJob(name.clone()))?;
            match RunPolicy::parse(policy) {
                Some(parsed) => job.set_policy(parsed),
                None => warn!(job = %name, policy = %policy, "unknown policy, keeping default"),
            }
        }

        for (name, user) in &self.users {
            let uid = resolve_user(user)?;
            builder
                .get_mut(name)
                .ok_or_else(|| ConfigError::UnknownJob(name.clone()))?
                .set_uid(uid);
        }
        for (name, group) in &self.groups {
            let gid = resolve_group(group)?;
            builder
                .get_mut(name)
                .ok_or_else(|| ConfigError::UnknownJob(name.clone()))?
                .set_gid(gid);
        }

        let registry = builder.freeze();

        for name in &self.activate {
            let job = registry
                .get(name)
                .ok_or_else(|| ConfigError::UnknownJob(name.clone()))?;
            let task = job
                .task()
                .ok_or_else(|| ConfigError::NotActivatable(name.clone()))?;
            let activation = task.activate();
            info!(job = %name, ?activation, "applying default trigger bindings");
            for period in activation.periods {
                self.triggers.cron.push((name.clone(), period));
            }
            if activation.get {
                self.triggers.http_get.push(name.clone());
            }
            if activation.post {
                self.triggers.http_post.push(name.clone());
            }
        }

        Ok(registry)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
