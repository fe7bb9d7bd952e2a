//! HTTP surface for the task-tracking backend.
//!
//! Builds the axum router, owns the state shared across handlers, and runs
//! the server until a termination signal arrives.

pub mod tasks;

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, patch};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::db::Database;
use crate::error::ApiResult;
use crate::types::Stats;

/// State shared across handlers.
#[derive(Clone)]
pub struct ApiServer {
    /// Store-access handle injected at construction.
    db: Database,
}

impl ApiServer {
    /// Create the handler state around an opened database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get the database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Aggregate statistics endpoint.
async fn stats(State(state): State<ApiServer>) -> ApiResult<Json<Stats>> {
    let stats = state.db().get_stats()?;
    Ok(Json(stats))
}

/// Build the router with all routes and middleware.
pub fn build_router(state: ApiServer) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/api/tasks/{id}/toggle", patch(tasks::toggle_task))
        .route("/api/subtasks/{id}/toggle", patch(tasks::toggle_subtask))
        .route("/api/stats", get(stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener and serve until the shutdown future resolves. Once
/// shutdown begins no new connections are accepted; in-flight requests are
/// drained before this returns.
pub async fn serve(
    db: Database,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = build_router(ApiServer::new(db));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("server stopped");
    Ok(())
}
