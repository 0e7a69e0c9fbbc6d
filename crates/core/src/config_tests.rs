// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::task::{Activation, TaskResult};
use async_trait::async_trait;

struct PingTask;

#[async_trait]
impl JobTask for PingTask {
    async fn run(&self) -> TaskResult {
        Ok("pong".to_string())
    }

    fn activate(&self) -> Activation {
        Activation {
            periods: vec!["10s".to_string()],
            get: true,
            post: false,
        }
    }
}

fn echo_spec(name: &str) -> JobSpec {
    JobSpec::exec(name, vec!["echo".to_string(), "hi".to_string()])
}

#[test]
fn single_token_command_is_split() {
    let spec = JobSpec::exec("ECHO", vec!["echo hello world".to_string()]);
    match spec.command {
        JobCommand::Exec(argv) => assert_eq!(argv, ["echo", "hello", "world"]),
        JobCommand::Task(_) => panic!("expected exec command"),
    }
}

#[test]
fn multi_token_command_is_untouched() {
    let spec = JobSpec::exec("ECHO", vec!["echo".to_string(), "a b".to_string()]);
    match spec.command {
        JobCommand::Exec(argv) => assert_eq!(argv, ["echo", "a b"]),
        JobCommand::Task(_) => panic!("expected exec command"),
    }
}

#[test]
fn duplicate_job_names_are_fatal() {
    let mut config = Config::default();
    config.jobs.push(echo_spec("A"));
    config.jobs.push(echo_spec("A"));
    assert!(matches!(
        config.build_registry(),
        Err(ConfigError::DuplicateJob(name)) if name == "A"
    ));
}

#[test]
fn empty_command_is_fatal() {
    let mut config = Config::default();
    config.jobs.push(JobSpec::exec("A", Vec::new()));
    assert!(matches!(
        config.build_registry(),
        Err(ConfigError::EmptyCommand(_))
    ));
}

#[test]
fn policy_is_applied_to_named_job() {
    let mut config = Config::default();
    config.jobs.push(echo_spec("A"));
    config
        .policies
        .push(("A".to_string(), "asap".to_string()));
    let registry = config.build_registry().unwrap();
    assert_eq!(registry.get("A").unwrap().policy(), RunPolicy::Asap);
}

#[test]
fn unknown_policy_string_keeps_default() {
    let mut config = Config::default();
    config.jobs.push(echo_spec("A"));
    config
        .policies
        .push(("A".to_string(), "whenever".to_string()));
    let registry = config.build_registry().unwrap();
    assert_eq!(registry.get("A").unwrap().policy(), RunPolicy::Ignore);
}

#[test]
fn policy_for_unknown_job_is_fatal() {
    let mut config = Config::default();
    config.jobs.push(echo_spec("A"));
    config
        .policies
        .push(("B".to_string(), "asap".to_string()));
    assert!(matches!(
        config.build_registry(),
        Err(ConfigError::UnknownJob(name)) if name == "B"
    ));
}

#[test]
fn run_as_ids_are_resolved_at_build_time() {
    let mut config = Config::default();
    config.jobs.push(echo_spec("A"));
    config.users.push(("A".to_string(), "0".to_string()));
    config.groups.push(("A".to_string(), "0".to_string()));
    let registry = config.build_registry().unwrap();
    let run_as = registry.get("A").unwrap().run_as();
    assert_eq!(run_as.uid, Some(0));
    assert_eq!(run_as.gid, Some(0));
}

#[test]
fn unresolvable_user_is_fatal() {
    let mut config = Config::default();
    config.jobs.push(echo_spec("A"));
    config
        .users
        .push(("A".to_string(), "hookd-no-such-user".to_string()));
    assert!(matches!(
        config.build_registry(),
        Err(ConfigError::Identity(_))
    ));
}

#[test]
fn activation_merges_task_bindings_once() {
    let mut config = Config::default();
    config
        .jobs
        .push(JobSpec::task("PING", Arc::new(PingTask)));
    config.activate.push("PING".to_string());
    config.build_registry().unwrap();

    assert_eq!(
        config.triggers.cron,
        vec![("PING".to_string(), "10s".to_string())]
    );
    assert_eq!(config.triggers.http_get, vec!["PING".to_string()]);
    assert!(config.triggers.http_post.is_empty());
}

#[test]
fn activating_a_command_job_is_fatal() {
    let mut config = Config::default();
    config.jobs.push(echo_spec("A"));
    config.activate.push("A".to_string());
    assert!(matches!(
        config.build_registry(),
        Err(ConfigError::NotActivatable(name)) if name == "A"
    ));
}

#[test]
fn activating_an_unknown_job_is_fatal() {
    let mut config = Config::default();
    config.jobs.push(echo_spec("A"));
    config.activate.push("GHOST".to_string());
    assert!(matches!(
        config.build_registry(),
        Err(ConfigError::UnknownJob(name)) if name == "GHOST"
    ));
}
