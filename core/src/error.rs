//! Error types for the ticket lifecycle engine.

use crate::types::TicketStatus;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, TicketError>;

/// Failure reported by a storage gateway.
///
/// Gateways report "no row matched the guarded update" as `Ok(false)`, never
/// as an error. This type is reserved for backend faults, and the engine
/// always translates it before it reaches a caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(String),

    /// A stored row could not be decoded into a domain value.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Internal state of the store is unusable (e.g. a poisoned lock).
    #[error("Storage unavailable")]
    Unavailable,
}

/// Error taxonomy for registration, attendance, and account operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TicketError {
    // ═══════════════════════════════════════════════════════════
    // Registration
    // ═══════════════════════════════════════════════════════════

    /// Registration target user does not exist.
    #[error("User {username} does not exist")]
    UserNotFound {
        /// Username that was looked up
        username: String,
    },

    /// Ticket request failed domain validation.
    #[error("Invalid ticket details: {reason}")]
    InvalidTicketDetails {
        /// Why the policy rejected the request
        reason: String,
    },

    /// No non-revoked ticket exists for the `(seat, gate)` pair.
    #[error("Ticket does not exist")]
    TicketNotFound,

    /// Ticket is already bound to a user.
    #[error("Ticket is already registered")]
    AlreadyRegistered,

    /// Storage reported non-success or inconsistent post-state while binding.
    #[error("Error registering ticket: {reason}")]
    RegistrationFailed {
        /// What went wrong
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Attendance
    // ═══════════════════════════════════════════════════════════

    /// Stored ticket has no identifier.
    #[error("Ticket has no ID")]
    TicketMissingId,

    /// Attendance attempted on a ticket that was never registered.
    #[error("Ticket is not yet registered")]
    NotRegistered,

    /// Ticket is not in the `valid` state.
    #[error("Invalid ticket status: {status}")]
    InvalidStatus {
        /// Status the ticket was found in
        status: TicketStatus,
    },

    /// Registered ticket has no seed.
    #[error("Ticket has no seed")]
    MissingSeed,

    /// Stored seed could not be decoded into TOTP secret material.
    #[error("Ticket seed is malformed")]
    InvalidSeed,

    /// TOTP code did not match the current time step.
    #[error("Invalid TOTP ticket code")]
    InvalidCode,

    /// Storage reported non-success or inconsistent post-state while marking used.
    #[error("Error updating ticket state: {reason}")]
    AttendanceUpdateFailed {
        /// What went wrong
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Accounts
    // ═══════════════════════════════════════════════════════════

    /// Username or password violates the account policy.
    #[error("Invalid user details: {reason}")]
    InvalidUserDetails {
        /// First rule that failed
        reason: String,
    },

    /// Username already exists (case-insensitive).
    #[error("Username is already taken")]
    UsernameTaken,

    /// Storage reported non-success or inconsistent post-state while creating the user.
    #[error("Error creating user: {reason}")]
    UserCreationFailed {
        /// What went wrong
        reason: String,
    },
}

impl TicketError {
    /// Stable, machine-readable error kind.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gatepass_core::TicketError;
    /// assert_eq!(TicketError::InvalidCode.kind(), "INVALID_CODE");
    /// ```
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound { .. } => "USER_NOT_FOUND",
            Self::InvalidTicketDetails { .. } => "INVALID_TICKET_DETAILS",
            Self::TicketNotFound => "TICKET_NOT_FOUND",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::RegistrationFailed { .. } => "REGISTRATION_FAILED",
            Self::TicketMissingId => "TICKET_MISSING_ID",
            Self::NotRegistered => "NOT_REGISTERED",
            Self::InvalidStatus { .. } => "INVALID_STATUS",
            Self::MissingSeed => "MISSING_SEED",
            Self::InvalidSeed => "INVALID_SEED",
            Self::InvalidCode => "INVALID_CODE",
            Self::AttendanceUpdateFailed { .. } => "ATTENDANCE_UPDATE_FAILED",
            Self::InvalidUserDetails { .. } => "INVALID_USER_DETAILS",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::UserCreationFailed { .. } => "USER_CREATION_FAILED",
        }
    }

    /// Returns `true` if this error is an expected outcome of client input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gatepass_core::TicketError;
    /// assert!(TicketError::AlreadyRegistered.is_user_error());
    /// assert!(!TicketError::MissingSeed.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound { .. }
                | Self::InvalidTicketDetails { .. }
                | Self::TicketNotFound
                | Self::AlreadyRegistered
                | Self::NotRegistered
                | Self::InvalidStatus { .. }
                | Self::InvalidCode
                | Self::InvalidUserDetails { .. }
                | Self::UsernameTaken
        )
    }

    /// Returns `true` if stored data breaks a lifecycle invariant.
    #[must_use]
    pub const fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            Self::TicketMissingId | Self::MissingSeed | Self::InvalidSeed
        )
    }

    /// Returns `true` if this error should be surfaced as a fraud signal.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gatepass_core::TicketError;
    /// assert!(TicketError::InvalidCode.is_security_issue());
    /// assert!(!TicketError::TicketNotFound.is_security_issue());
    /// ```
    #[must_use]
    pub const fn is_security_issue(&self) -> bool {
        matches!(self, Self::InvalidCode)
    }
}
