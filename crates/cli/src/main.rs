// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! hookd - cron-style job dispatch driven by pluggable trigger hooks

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod opts;
mod tasks;

use anyhow::Context;
use clap::Parser;
use hookd_engine::Engine;
use hookd_hooks::{CronHook, Hook, WebhookHook};
use opts::Cli;
use std::io::IsTerminal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let mut config = cli.into_config()?;

    if config.jobs.is_empty() {
        warn!("no jobs configured, exiting");
        return Ok(());
    }

    let registry = config.build_registry().context("configuration")?;

    let hooks: Vec<Box<dyn Hook>> = vec![Box::new(CronHook::new()), Box::new(WebhookHook::new())];
    let mut engine = Engine::new(registry, hooks, config.poll_interval);
    engine
        .configure(&config.triggers)
        .context("configuring hooks")?;

    engine.run(wait_for_interrupt()).await?;
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn wait_for_interrupt() {
    use tokio::signal::unix::{signal, SignalKind};

    let interrupt = signal(SignalKind::interrupt());
    let terminate = signal(SignalKind::terminate());
    let (mut interrupt, mut terminate) = match (interrupt, terminate) {
        (Ok(i), Ok(t)) => (i, t),
        _ => {
            error!("failed to install signal handlers");
            return std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = interrupt.recv() => info!("received interrupt"),
        _ = terminate.recv() => info!("received terminate"),
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}
