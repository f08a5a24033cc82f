//! Account endpoints.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use gatepass_core::User;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/users`.
#[derive(Clone, Deserialize, Serialize)]
pub struct CreateUserRequest {
    /// Requested username
    pub username: String,
    /// Plain-text password; hashed by storage
    pub password: String,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /api/users` → 201 with the stored user (no password).
///
/// # Errors
///
/// Policy violations map to 400, a taken username to 409.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state
        .service
        .create_user(&request.username, &request.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}
