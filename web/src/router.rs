//! Route table.

use crate::handlers::{create_user, health_check, log_attendance, register_ticket};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the HTTP router.
///
/// | Method | Path | Success |
/// |---|---|---|
/// | `GET` | `/health` | 200 |
/// | `POST` | `/api/users` | 201 |
/// | `POST` | `/api/users/attendance` | 202 |
/// | `POST` | `/api/users/:username/tickets` | 202 |
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/users", post(create_user))
        .route("/api/users/attendance", post(log_attendance))
        .route("/api/users/:username/tickets", post(register_ticket))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
