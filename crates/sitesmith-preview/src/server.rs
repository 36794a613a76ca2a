//! Static file server for generated sites.
//!
//! Serves one directory with `ServeDir` on the first free port of a small
//! window, in a background task that stops through a oneshot channel.

use crate::config::{port_window, PreviewConfig};
use crate::PreviewError;
use axum::{response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Path of the health endpoint; kept out of the way of site files
pub const HEALTH_PATH: &str = "/_sitesmith/health";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Directory being served
    pub root: String,
}

/// Build the router serving `root`
///
/// `/` maps to `index.html`; unknown paths are 404.
pub fn create_router(root: impl AsRef<Path>) -> Router {
    let root = root.as_ref().to_path_buf();
    let health_root = root.display().to_string();

    Router::new()
        .route(
            HEALTH_PATH,
            get(move || {
                let root = health_root.clone();
                async move {
                    Json(HealthCheckResponse {
                        status: "healthy".to_string(),
                        root,
                    })
                }
            }),
        )
        .fallback_service(ServeDir::new(root))
        .layer(TraceLayer::new_for_http())
}

/// First port in `start..start+attempts` that can be bound on `host`
///
/// The probe socket is closed again before returning, so another process may
/// take the port in between. [`PreviewServer::start`] keeps its listener
/// instead of probing.
pub fn find_free_port(host: &str, start: u16, attempts: u16) -> Option<u16> {
    bind_first_free(host, port_window(start, attempts))
        .and_then(|listener| listener.local_addr().ok())
        .map(|addr| addr.port())
}

fn bind_first_free(
    host: &str,
    ports: impl IntoIterator<Item = u16>,
) -> Option<std::net::TcpListener> {
    ports
        .into_iter()
        .find_map(|port| match std::net::TcpListener::bind((host, port)) {
            Ok(listener) => Some(listener),
            Err(e) => {
                debug!("Port {} unavailable: {}", port, e);
                None
            }
        })
}

/// A running preview server
///
/// Dropping the handle also signals shutdown.
#[derive(Debug)]
pub struct PreviewServer {
    addr: SocketAddr,
    root: PathBuf,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PreviewServer {
    /// Serve `config.root_dir` on the first free port
    ///
    /// # Errors
    ///
    /// `RootNotFound` when the directory does not exist, `NoFreePort` when
    /// every candidate port is taken.
    pub async fn start(config: &PreviewConfig) -> Result<Self, PreviewError> {
        config.validate()?;

        if !config.root_dir.is_dir() {
            return Err(PreviewError::RootNotFound(config.root_dir.clone()));
        }

        let listener = bind_first_free(&config.bind_address, config.candidate_ports())
            .ok_or_else(|| PreviewError::NoFreePort {
                host: config.bind_address.clone(),
                start: config.start_port,
                attempts: config.max_port_attempts,
            })?;
        listener.set_nonblocking(true)?;
        let listener = TcpListener::from_std(listener)?;
        let addr = listener.local_addr()?;
        let app = create_router(&config.root_dir);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await;
            if let Err(e) = result {
                error!("Preview server failed: {}", e);
            }
        });

        info!(
            "Preview server for {} listening on {}",
            config.root_dir.display(),
            addr
        );

        Ok(Self {
            addr,
            root: config.root_dir.clone(),
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    /// Bound port
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Served directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Browser URL
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port())
    }

    /// Whether shutdown has not been requested yet
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }

    /// Signal shutdown without waiting
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("Preview server on port {} shutdown initiated", self.port());
        }
    }

    /// Signal shutdown and wait for in-flight requests to finish
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Preview server task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PreviewServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
