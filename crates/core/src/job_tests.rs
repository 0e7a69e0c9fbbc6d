// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::task::{Activation, TaskResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Job appending one line to `path` per run, then sleeping so the test can
/// observe the running state.
fn counting_job(path: &Path, hold_ms: u64) -> Arc<Job> {
    let script = format!("echo x >> {} && sleep {}", path.display(), hold_ms as f64 / 1000.0);
    Arc::new(Job::new(
        "COUNT",
        JobCommand::Exec(vec!["sh".to_string(), "-c".to_string(), script]),
    ))
}

fn run_count(path: &Path) -> usize {
    std::fs::read_to_string(path).map_or(0, |s| s.lines().count())
}

async fn wait_finished(job: &Arc<Job>) {
    for _ in 0..400 {
        if job.finished() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} never finished", job.name);
}

fn marker(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("runs")
}

#[tokio::test]
async fn start_executes_and_stores_exit_code() {
    let job = Arc::new(Job::new("TRUE", JobCommand::Exec(vec!["true".to_string()])));
    assert!(!job.finished());
    assert_eq!(job.result(), None);

    job.start();
    wait_finished(&job).await;

    assert_eq!(job.result(), Some(JobOutcome::Exit(0)));
    job.cleanup();
    assert!(!job.finished());
    assert_eq!(job.result(), None);
}

#[tokio::test]
async fn nonzero_exit_is_stored_not_raised() {
    let job = Arc::new(Job::new("FALSE", JobCommand::Exec(vec!["false".to_string()])));
    job.start();
    wait_finished(&job).await;
    assert_eq!(job.result(), Some(JobOutcome::Exit(1)));
}

#[tokio::test]
async fn spawn_failure_is_stored_not_raised() {
    let job = Arc::new(Job::new(
        "MISSING",
        JobCommand::Exec(vec!["/nonexistent/hookd-test-binary".to_string()]),
    ));
    job.start();
    wait_finished(&job).await;
    assert!(matches!(job.result(), Some(JobOutcome::Failed(_))));
}

#[tokio::test]
async fn ignore_policy_drops_duplicate_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = marker(&dir);
    let job = counting_job(&path, 300);

    job.start();
    tokio::time::sleep(Duration::from_millis(100)).await;
    job.start();
    job.start();
    wait_finished(&job).await;
    job.cleanup();

    // duplicate requests were dropped, and cleanup did not restart anything
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(run_count(&path), 1);
    assert!(!job.finished());
}

#[tokio::test]
async fn asap_policy_coalesces_into_one_rerun() {
    let dir = tempfile::tempdir().unwrap();
    let path = marker(&dir);
    let mut job = Job::new(
        "COUNT",
        JobCommand::Exec(vec![
            "sh".to_string(),
            "-c".to_string(),
            format!("echo x >> {} && sleep 0.2", path.display()),
        ]),
    );
    job.set_policy(RunPolicy::Asap);
    let job = Arc::new(job);

    job.start();
    tokio::time::sleep(Duration::from_millis(50)).await;
    // three extra requests while running coalesce into a single rerun
    job.start();
    job.start();
    job.start();

    wait_finished(&job).await;
    job.cleanup();
    wait_finished(&job).await;
    job.cleanup();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(run_count(&path), 2);
    assert!(!job.finished());
}

#[tokio::test]
async fn finished_is_false_while_executing() {
    let job = Arc::new(Job::new(
        "SLEEP",
        JobCommand::Exec(vec!["sleep".to_string(), "0.3".to_string()]),
    ));
    job.start();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!job.finished());
    wait_finished(&job).await;
}

struct OkTask;

#[async_trait]
impl JobTask for OkTask {
    async fn run(&self) -> TaskResult {
        Ok("done".to_string())
    }
}

struct FailTask;

#[async_trait]
impl JobTask for FailTask {
    async fn run(&self) -> TaskResult {
        Err("boom".to_string())
    }

    fn activate(&self) -> Activation {
        Activation {
            periods: vec!["5s".to_string()],
            get: true,
            post: false,
        }
    }
}

#[tokio::test]
async fn task_value_becomes_the_result() {
    let job = Arc::new(Job::new("OK", JobCommand::Task(Arc::new(OkTask))));
    job.start();
    wait_finished(&job).await;
    assert_eq!(job.result(), Some(JobOutcome::Task("done".to_string())));
}

#[tokio::test]
async fn task_error_becomes_a_failed_result() {
    let job = Arc::new(Job::new("FAIL", JobCommand::Task(Arc::new(FailTask))));
    job.start();
    wait_finished(&job).await;
    assert_eq!(job.result(), Some(JobOutcome::Failed("boom".to_string())));
}

#[test]
fn task_accessor_distinguishes_commands() {
    let exec = Job::new("E", JobCommand::Exec(vec!["true".to_string()]));
    assert!(exec.task().is_none());

    let task = Job::new("T", JobCommand::Task(Arc::new(FailTask)));
    let activation = task.task().map(|t| t.activate());
    assert_eq!(
        activation,
        Some(Activation {
            periods: vec!["5s".to_string()],
            get: true,
            post: false,
        })
    );
}

#[test]
fn policy_parse_accepts_known_values() {
    assert_eq!(RunPolicy::parse("ignore"), Some(RunPolicy::Ignore));
    assert_eq!(RunPolicy::parse("ASAP"), Some(RunPolicy::Asap));
    assert_eq!(RunPolicy::parse("retry"), None);
}
