// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job entity and its execution state machine

use crate::identity::RunAs;
use crate::task::JobTask;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::info;

/// What to do with a run request that arrives while the job is already
/// running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPolicy {
    /// Drop the request.
    #[default]
    Ignore,
    /// Coalesce into a single rerun once the current execution finishes.
    Asap,
}

impl RunPolicy {
    /// Parse a policy string from configuration. Unknown strings are not an
    /// error here; the caller logs and keeps the job's default.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("ignore") {
            Some(RunPolicy::Ignore)
        } else if s.eq_ignore_ascii_case("asap") {
            Some(RunPolicy::Asap)
        } else {
            None
        }
    }
}

impl fmt::Display for RunPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPolicy::Ignore => write!(f, "ignore"),
            RunPolicy::Asap => write!(f, "asap"),
        }
    }
}

/// The work a job performs: an executable argv or an in-process task.
#[derive(Clone)]
pub enum JobCommand {
    Exec(Vec<String>),
    Task(Arc<dyn JobTask>),
}

impl fmt::Debug for JobCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobCommand::Exec(argv) => f.debug_tuple("Exec").field(argv).finish(),
            JobCommand::Task(_) => f.debug_tuple("Task").finish(),
        }
    }
}

impl JobCommand {
    async fn execute(&self, run_as: RunAs) -> JobOutcome {
        match self {
            JobCommand::Exec(argv) => {
                let Some((program, args)) = argv.split_first() else {
                    return JobOutcome::Failed("empty command".to_string());
                };
                let mut cmd = tokio::process::Command::new(program);
                cmd.args(args);
                #[cfg(unix)]
                {
                    if let Some(uid) = run_as.uid {
                        cmd.uid(uid);
                    }
                    if let Some(gid) = run_as.gid {
                        cmd.gid(gid);
                    }
                }
                match cmd.status().await {
                    Ok(status) => JobOutcome::Exit(status.code().unwrap_or(-1)),
                    Err(e) => JobOutcome::Failed(e.to_string()),
                }
            }
            JobCommand::Task(task) => match task.run().await {
                Ok(value) => JobOutcome::Task(value),
                Err(err) => JobOutcome::Failed(err),
            },
        }
    }
}

/// Result of one completed execution. A "bad" outcome (nonzero exit, task
/// error, spawn failure) is data, not an engine error: the sweep logs it and
/// moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Process exit code (-1 when terminated by a signal).
    Exit(i32),
    /// Value returned by an in-process task.
    Task(String),
    /// The execution itself failed (spawn error or task error).
    Failed(String),
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Exit(code) => write!(f, "exit code {}", code),
            JobOutcome::Task(value) => write!(f, "task value {:?}", value),
            JobOutcome::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
    /// Running with one coalesced rerun request (ASAP policy only).
    RerunPending,
}

/// Mutable execution state, guarded by a single mutex so the Idle -> Running
/// transition is atomic.
#[derive(Debug)]
struct ExecCell {
    state: RunState,
    outcome: Option<JobOutcome>,
}

/// A named unit of work with duplicate-run policy and execution state.
///
/// The job's own execution task is the only writer of `outcome`; the master
/// loop's sweep is the only caller of [`Job::cleanup`]. Both go through the
/// cell mutex. Completion is detected by the sweep, not signalled: a finished
/// job stays `Running` with its outcome stored until the sweep collects it.
pub struct Job {
    pub name: String,
    command: JobCommand,
    policy: RunPolicy,
    run_as: RunAs,
    cell: Arc<Mutex<ExecCell>>,
}

impl Job {
    pub fn new(name: impl Into<String>, command: JobCommand) -> Self {
        Self {
            name: name.into(),
            command,
            policy: RunPolicy::default(),
            run_as: RunAs::default(),
            cell: Arc::new(Mutex::new(ExecCell {
                state: RunState::Idle,
                outcome: None,
            })),
        }
    }

    pub fn policy(&self) -> RunPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: RunPolicy) {
        self.policy = policy;
    }

    pub fn run_as(&self) -> RunAs {
        self.run_as
    }

    pub fn set_uid(&mut self, uid: u32) {
        self.run_as.uid = Some(uid);
    }

    pub fn set_gid(&mut self, gid: u32) {
        self.run_as.gid = Some(gid);
    }

    /// The in-process task backing this job, if it has one.
    pub fn task(&self) -> Option<Arc<dyn JobTask>> {
        match &self.command {
            JobCommand::Task(task) => Some(Arc::clone(task)),
            JobCommand::Exec(_) => None,
        }
    }

    /// Request execution. Non-blocking: the command runs on its own task.
    ///
    /// While the job is already running, the request is resolved by policy:
    /// `Ignore` drops it, `Asap` records a single pending rerun (a flag, not
    /// a counter, so N requests coalesce into one).
    pub fn start(&self) {
        let mut cell = self.cell.lock().unwrap_or_else(|e| e.into_inner());
        match cell.state {
            RunState::Idle => {
                cell.state = RunState::Running;
                drop(cell);
                let command = self.command.clone();
                let run_as = self.run_as;
                let cell = Arc::clone(&self.cell);
                tokio::spawn(async move {
                    let outcome = command.execute(run_as).await;
                    let mut cell = cell.lock().unwrap_or_else(|e| e.into_inner());
                    cell.outcome = Some(outcome);
                });
            }
            RunState::Running | RunState::RerunPending => match self.policy {
                RunPolicy::Ignore => {
                    info!(job = %self.name, "already running, request ignored");
                }
                RunPolicy::Asap => {
                    info!(job = %self.name, "already running, rerun scheduled");
                    cell.state = RunState::RerunPending;
                }
            },
        }
    }

    /// True iff an execution has completed but its outcome has not yet been
    /// collected. False while idle or still executing.
    pub fn finished(&self) -> bool {
        let cell = self.cell.lock().unwrap_or_else(|e| e.into_inner());
        cell.state != RunState::Idle && cell.outcome.is_some()
    }

    /// The stored outcome, if an execution has completed.
    pub fn result(&self) -> Option<JobOutcome> {
        let cell = self.cell.lock().unwrap_or_else(|e| e.into_inner());
        cell.outcome.clone()
    }

    /// Collect a finished execution: clear the outcome and return to idle.
    /// If a rerun was coalesced under the ASAP policy, clear the flag and
    /// start again immediately. One extra run, never a queue of them.
    pub fn cleanup(&self) {
        let rerun = {
            let mut cell = self.cell.lock().unwrap_or_else(|e| e.into_inner());
            let rerun = cell.state == RunState::RerunPending;
            cell.state = RunState::Idle;
            cell.outcome = None;
            rerun
        };
        if rerun {
            info!(job = %self.name, "running coalesced request");
            self.start();
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
