//! # ccube-server
//!
//! Read-only HTTP surface for the C-Cube QA store.
//!
//! - [`router`] builds the axum [`Router`](axum::Router) for the JSON API
//! - [`serve`] binds a listener and runs until Ctrl-C
//! - [`ServerConfig`] reads `CCUBE_*` environment variables
//! - [`ApiError`] renders store errors as `{"error": ...}` responses

pub mod config;
pub mod error;
pub mod routes;

use std::net::SocketAddr;

use tracing::info;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::{router, AppState};

/// Serve the API on `addr` until the process receives Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "ccube API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("received SIGINT, shutting down"),
                // No signal handler: run until killed.
                Err(_) => std::future::pending::<()>().await,
            }
        })
        .await?;

    info!("ccube API stopped");
    Ok(())
}
