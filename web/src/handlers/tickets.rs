//! Registration and attendance endpoints.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use gatepass_core::{AttendanceLog, Ticket, TicketId, TicketRequest, TicketStatus, UserId};
use serde::{Deserialize, Serialize};

/// Ticket as returned over HTTP.
///
/// The seed is only included in the registration response, where the holder
/// needs it to provision their code generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketView {
    /// Ticket id
    pub id: Option<TicketId>,
    /// Owner
    pub user_id: Option<UserId>,
    /// Seat label
    pub seat: String,
    /// Gate label
    pub gate: String,
    /// Lifecycle status
    pub status: TicketStatus,
    /// Base64 seed, registration only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    /// Provisioning time
    pub created_at: Option<DateTime<Utc>>,
    /// Admission time
    pub used_at: Option<DateTime<Utc>>,
}

impl TicketView {
    /// View including the seed.
    #[must_use]
    pub fn with_seed(ticket: Ticket) -> Self {
        let seed = ticket.seed.as_ref().map(|s| s.as_str().to_string());
        Self {
            seed,
            ..Self::without_seed(ticket)
        }
    }

    /// View with the seed withheld.
    #[must_use]
    pub fn without_seed(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            user_id: ticket.user_id,
            seat: ticket.seat,
            gate: ticket.gate,
            status: ticket.status,
            seed: None,
            created_at: ticket.created_at,
            used_at: ticket.used_at,
        }
    }
}

/// `POST /api/users/:username/tickets` → 202 with the bound ticket.
///
/// # Errors
///
/// Unknown user or ticket map to 404, an already bound ticket to 409, storage
/// failures to 500.
pub async fn register_ticket(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<TicketRequest>,
) -> Result<(StatusCode, Json<TicketView>), AppError> {
    let ticket = state.service.register_ticket(&username, &request).await?;
    Ok((StatusCode::ACCEPTED, Json(TicketView::with_seed(ticket))))
}

/// `POST /api/users/attendance` → 202 with the used ticket.
///
/// # Errors
///
/// A wrong code maps to 401, a used ticket to 409, integrity violations and
/// storage failures to 500.
pub async fn log_attendance(
    State(state): State<AppState>,
    Json(attendance): Json<AttendanceLog>,
) -> Result<(StatusCode, Json<TicketView>), AppError> {
    let ticket = state.service.log_attendance(&attendance).await?;
    Ok((StatusCode::ACCEPTED, Json(TicketView::without_seed(ticket))))
}
