//! HTTP surface for dirserve.
//!
//! | Verb | Path | Behavior |
//! |---|---|---|
//! | GET | `/home/` | List the root |
//! | GET | `/home/{path}` | List a directory, or describe a file (`?content=true` for its bytes) |
//! | POST | `/home/{path}` | Create a folder |
//! | POST (multipart) | `/home/{path}` | Upload files into a folder |
//! | POST (multipart) | `/home/` | Upload files into the root |
//! | PUT | `/home/{path}` | Create or replace a file |
//!
//! Paths that fail to resolve or escape the root answer `400`, a directory
//! where a file is expected (or the reverse) answers `404`, and filesystem
//! failures answer a generic `500`.

mod error;
mod routes;
mod state;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

pub use error::ApiError;
pub use routes::{GetParams, router};
pub use state::AppState;

/// Serve until Ctrl+C is received.
pub async fn serve(state: AppState, bind: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(
        addr = %listener.local_addr()?,
        root = %state.root().as_path().display(),
        writes = state.executor().writes_enabled(),
        "Listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
