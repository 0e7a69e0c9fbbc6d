// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line options and config assembly

use clap::{ArgAction, Parser};
use hookd_core::{Config, ConfigError, JobSpec, TriggerConfig};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "hookd",
    version,
    about = "Cron-style job dispatch driven by pluggable trigger hooks"
)]
pub struct Cli {
    /// Define a job: -j NAME COMMAND [ARGS...]
    #[arg(
        short = 'j',
        long = "job",
        num_args = 2..,
        value_names = ["NAME", "COMMAND"],
        action = ArgAction::Append
    )]
    job: Vec<Vec<String>>,

    /// Register a built-in task-backed job (e.g. TICK)
    #[arg(long = "task", value_name = "NAME", action = ArgAction::Append)]
    task: Vec<String>,

    /// Duplicate-run policy for a job: --policy NAME {ignore|asap}
    #[arg(long, num_args = 2, value_names = ["NAME", "POLICY"], action = ArgAction::Append)]
    policy: Vec<Vec<String>>,

    /// Run a job's command as this user: --user NAME USER
    #[arg(long, num_args = 2, value_names = ["NAME", "USER"], action = ArgAction::Append)]
    user: Vec<Vec<String>>,

    /// Run a job's command with this group: --group NAME GROUP
    #[arg(long, num_args = 2, value_names = ["NAME", "GROUP"], action = ArgAction::Append)]
    group: Vec<Vec<String>>,

    /// Fire a job periodically: -p NAME PERIOD (45, 10s, 2m, 1h, 1d)
    #[arg(
        short = 'p',
        long = "cron-period",
        num_args = 2,
        value_names = ["NAME", "PERIOD"],
        action = ArgAction::Append
    )]
    cron_period: Vec<Vec<String>>,

    /// Fire a job on GET /NAME
    #[arg(long = "get", value_name = "NAME", action = ArgAction::Append)]
    http_get: Vec<String>,

    /// Fire a job on POST /NAME
    #[arg(long = "post", value_name = "NAME", action = ArgAction::Append)]
    http_post: Vec<String>,

    /// Webhook listener bind address
    #[arg(long, default_value = "0.0.0.0", value_name = "ADDRESS")]
    http_address: String,

    /// Webhook listener port
    #[arg(long, default_value_t = 5152, value_name = "PORT")]
    http_port: u16,

    /// Apply a job's default trigger bindings from its task
    #[arg(short = 'a', long = "activate", value_name = "NAME", action = ArgAction::Append)]
    activate: Vec<String>,

    /// Master loop poll interval in seconds when idle
    #[arg(short = 's', long = "sleep", default_value_t = 1.0, value_name = "SECONDS")]
    sleep: f64,
}

impl Cli {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let mut config = Config::default();

        for mut spec in self.job {
            let name = if spec.is_empty() {
                String::new()
            } else {
                spec.remove(0)
            };
            config.jobs.push(JobSpec::exec(name, spec));
        }
        for name in self.task {
            let task = crate::tasks::builtin(&name)
                .ok_or_else(|| ConfigError::UnknownTask(name.clone()))?;
            config.jobs.push(JobSpec::task(name, task));
        }

        config.policies = pairs(self.policy);
        config.users = pairs(self.user);
        config.groups = pairs(self.group);
        config.activate = self.activate;
        config.triggers = TriggerConfig {
            cron: pairs(self.cron_period),
            http_get: self.http_get,
            http_post: self.http_post,
            http_address: self.http_address,
            http_port: self.http_port,
        };
        config.poll_interval =
            Duration::try_from_secs_f64(self.sleep).unwrap_or(Duration::from_secs(1));

        Ok(config)
    }
}

/// clap delivers each `--flag A B` occurrence as a two-element group.
fn pairs(groups: Vec<Vec<String>>) -> Vec<(String, String)> {
    groups
        .into_iter()
        .map(|mut group| {
            let second = group.pop().unwrap_or_default();
            let first = group.pop().unwrap_or_default();
            (first, second)
        })
        .collect()
}

#[cfg(test)]
#[path = "opts_tests.rs"]
mod tests;
