//! Expenseur is a backend for tracking personal expenses.
//!
//! This library provides a JSON REST API for registering an account, logging
//! in with short lived access tokens, and recording, filtering and
//! summarizing expenses by category and priority.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
pub mod auth;
mod categories;
mod date_range;
mod db;
pub mod endpoints;
mod error;
mod expenses;
pub mod models;
mod pagination;
mod priorities;
mod profile;
mod register;
mod routing;
mod statistics;
pub mod stores;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use pagination::PaginationConfig;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
