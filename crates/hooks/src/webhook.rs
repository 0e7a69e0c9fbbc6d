// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP trigger: fires subscribed jobs on inbound requests
//!
//! Wire contract: `GET|POST /<job-name>` answers `200 OK` with body `"OK\n"`
//! and dispatches the job asynchronously; anything else answers 404. The
//! acknowledgement is sent before the job runs; this is a fire-and-forget
//! trigger, not a synchronous invocation.

use crate::Hook;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use hookd_core::{ConfigError, Dispatch, DispatchSender, Job, JobRegistry, TriggerConfig};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// One (job, method) subscription. The bound path is always `/<job-name>`.
struct Binding {
    job: Arc<Job>,
    method: Method,
}

struct RouterState {
    bindings: Vec<Binding>,
    queue: DispatchSender,
}

impl RouterState {
    fn find(&self, method: &Method, path: &str) -> Option<&Arc<Job>> {
        self.bindings
            .iter()
            .find(|b| b.method == *method && path.strip_prefix('/') == Some(b.job.name.as_str()))
            .map(|b| &b.job)
    }
}

/// Fires subscribed jobs on inbound `GET`/`POST` requests.
pub struct WebhookHook {
    bindings: Vec<Binding>,
    address: String,
    port: u16,
    stop: watch::Sender<bool>,
    running: Arc<AtomicBool>,
}

impl WebhookHook {
    pub fn new() -> Self {
        let (stop, _) = watch::channel(false);
        Self {
            bindings: Vec::new(),
            address: String::new(),
            port: 0,
            stop,
            running: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for WebhookHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for WebhookHook {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn configure(
        &mut self,
        registry: &JobRegistry,
        triggers: &TriggerConfig,
    ) -> Result<(), ConfigError> {
        self.address = triggers.http_address.clone();
        self.port = triggers.http_port;

        for (names, method) in [
            (&triggers.http_get, Method::GET),
            (&triggers.http_post, Method::POST),
        ] {
            for name in names {
                let job = registry
                    .get(name)
                    .ok_or_else(|| ConfigError::UnknownJob(name.clone()))?;
                self.bindings.push(Binding {
                    job,
                    method: method.clone(),
                });
            }
        }
        Ok(())
    }

    fn empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn start(&mut self, queue: DispatchSender) {
        let bindings: Vec<Binding> = self
            .bindings
            .iter()
            .map(|b| Binding {
                job: Arc::clone(&b.job),
                method: b.method.clone(),
            })
            .collect();
        let addr = format!("{}:{}", self.address, self.port);
        let mut stop = self.stop.subscribe();
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::SeqCst);

        let names: Vec<&str> = bindings.iter().map(|b| b.job.name.as_str()).collect();
        info!(%addr, jobs = ?names, "webhook hook starting");

        let app = router(Arc::new(RouterState { bindings, queue }));
        tokio::spawn(async move {
            // a bind failure disables this hook only; other hooks and the
            // master loop keep operating
            let listener = match tokio::net::TcpListener::bind(&addr).await {
                Ok(listener) => listener,
                Err(e) => {
                    error!(%addr, error = %e, "webhook listener failed to bind");
                    running.store(false, Ordering::SeqCst);
                    return;
                }
            };
            let serve = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                let _ = stop.changed().await;
            });
            if let Err(e) = serve.await {
                error!(error = %e, "webhook listener error");
            }
            running.store(false, Ordering::SeqCst);
            info!("webhook hook stopped");
        });
    }

    fn stop(&self) {
        info!("stopping webhook hook");
        let _ = self.stop.send(true);
    }

    fn running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

fn router(state: Arc<RouterState>) -> Router {
    Router::new().fallback(dispatch_request).with_state(state)
}

async fn dispatch_request(
    State(state): State<Arc<RouterState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    let method = request.method();
    let path = request.uri().path();
    match state.find(method, path) {
        Some(job) => {
            let source = format!("HTTP {} request from {}", method, peer.ip());
            info!(job = %job.name, %peer, "webhook matched");
            if state.queue.send(Dispatch::run(Arc::clone(job), source)).is_err() {
                warn!(job = %job.name, "dispatch queue closed, request dropped");
            }
            (StatusCode::OK, "OK\n").into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            "no job hook configured for this method and path\n",
        )
            .into_response(),
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
