//! Domain types: users, tickets, and the transient request shapes.

use crate::seed::Seed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// User identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Ticket identifier, assigned by storage when the ticket is provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub Uuid);

impl TicketId {
    /// Generate a new random ticket ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of a ticket.
///
/// The engine only ever performs `Valid → Used`. `Revoked` is set
/// administratively outside this crate, and revoked tickets are invisible to
/// seat/gate lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Admissible at the gate.
    #[default]
    Valid,
    /// Already consumed at the gate.
    Used,
    /// Withdrawn by an administrator.
    Revoked,
}

impl TicketStatus {
    /// Storage representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Used => "used",
            Self::Revoked => "revoked",
        }
    }

    /// Parse a status from its storage representation.
    ///
    /// Returns `None` for unknown strings.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "valid" => Some(Self::Valid),
            "used" => Some(Self::Used),
            "revoked" => Some(Self::Revoked),
            _ => None,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account as seen by the engine.
///
/// The password field carries whatever opaque credential storage returned.
/// The engine never inspects it, and it is neither serialized nor printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique, immutable identifier.
    pub id: UserId,
    /// Unique, case-insensitive username.
    pub username: String,
    /// Opaque credential.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
}

impl User {
    /// Create a user record without a credential.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password: None,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// One admission slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Storage-assigned identifier.
    #[serde(default)]
    pub id: Option<TicketId>,
    /// Owning user; `None` while unregistered.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Seat label.
    pub seat: String,
    /// Gate label.
    pub gate: String,
    /// TOTP seed, base64 text. Present once the ticket is bound.
    #[serde(default)]
    pub seed: Option<Seed>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: TicketStatus,
    /// Provisioning time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Set exactly once, at the `valid → used` transition.
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Create an unbound, valid ticket for a `(seat, gate)` slot.
    #[must_use]
    pub fn unbound(id: TicketId, seat: impl Into<String>, gate: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            user_id: None,
            seat: seat.into(),
            gate: gate.into(),
            seed: None,
            status: TicketStatus::Valid,
            created_at: None,
            used_at: None,
        }
    }

    /// Whether the ticket has been bound to a user.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.user_id.is_some()
    }

    /// Whether the ticket can still be presented at the gate.
    #[must_use]
    pub fn is_admissible(&self) -> bool {
        self.status == TicketStatus::Valid
    }
}

/// Registration request: the slot a user wants to claim.
///
/// Unknown fields in the incoming payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRequest {
    /// Seat label.
    pub seat: String,
    /// Gate label.
    pub gate: String,
}

impl TicketRequest {
    /// Create a new ticket request.
    #[must_use]
    pub fn new(seat: impl Into<String>, gate: impl Into<String>) -> Self {
        Self {
            seat: seat.into(),
            gate: gate.into(),
        }
    }
}

/// Attendance request presented at the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceLog {
    /// Seat label.
    pub seat: String,
    /// Gate label.
    pub gate: String,
    /// Code shown by the holder's device.
    pub totp_code: String,
}

impl AttendanceLog {
    /// Create a new attendance request.
    #[must_use]
    pub fn new(
        seat: impl Into<String>,
        gate: impl Into<String>,
        totp_code: impl Into<String>,
    ) -> Self {
        Self {
            seat: seat.into(),
            gate: gate.into(),
            totp_code: totp_code.into(),
        }
    }
}
