//! HTTP server
//!
//! ```text
//! POST   /api/tasks/generate  goal → generated task records
//! GET    /api/tasks/test      liveness
//! GET    /api/tasks           stored tasks
//! POST   /api/tasks           store a task
//! GET    /api/tasks/{id}      one stored task
//! DELETE /api/tasks/{id}      remove a stored task
//! ```

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::planning::TaskGenerator;
use crate::state::StateManager;

mod error;
mod routes;

pub use error::{ApiError, ErrorBody};
pub use routes::LIVENESS;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<TaskGenerator>,
    pub store: StateManager,
}

impl AppState {
    pub fn new(generator: TaskGenerator, store: StateManager) -> Self {
        Self {
            generator: Arc::new(generator),
            store,
        }
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    debug!("router: called");
    Router::new()
        .route("/api/tasks/generate", post(routes::generate_tasks))
        .route("/api/tasks/test", get(routes::liveness))
        .route("/api/tasks", get(routes::list_tasks).post(routes::create_task))
        .route("/api/tasks/{id}", get(routes::get_task).delete(routes::delete_task))
        .with_state(state)
}

/// Serve the API on an already-bound listener until ctrl-c
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "TaskPlanner listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    debug!("shutdown_signal: waiting for ctrl_c");
    if let Err(e) = tokio::signal::ctrl_c().await {
        debug!(error = %e, "shutdown_signal: ctrl_c handler failed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
