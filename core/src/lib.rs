//! # Gatepass Core
//!
//! Ticket lifecycle and attendance-verification engine.
//!
//! A ticket is provisioned ahead of time for a `(seat, gate)` slot. It is
//! bound to exactly one user at registration, and consumed exactly once at the
//! gate by presenting a time-based one-time code derived from the ticket seed.
//!
//! ## Core Concepts
//!
//! - **Ticket**: one admission slot, `valid → used`, `user_id: None → Some`
//! - **Gateway**: [`gateway::UserRepository`] and [`gateway::TicketRepository`],
//!   the only way the engine touches storage
//! - **Registration**: [`RegistrationOrchestrator`] binds a ticket to a user
//! - **Attendance**: [`AttendanceVerifier`] checks a TOTP code and marks the
//!   ticket used
//! - **Environment**: time is injected through [`environment::Clock`]
//!
//! ## Lifecycle
//!
//! ```text
//!                 register_ticket                log_attendance
//!   ┌──────────┐  (user_id := u)   ┌──────────┐  (valid code)   ┌──────────┐
//!   │ unbound  │ ────────────────▶ │  bound   │ ──────────────▶ │   used   │
//!   │  valid   │                   │  valid   │                 │ used_at  │
//!   └──────────┘                   └──────────┘                 └──────────┘
//! ```
//!
//! Both transitions are compare-and-swap operations on the storage side: the
//! gateway reports `false` when the guarded update affected no rows, and the
//! engine treats that as failure.
//!
//! ## Example
//!
//! ```ignore
//! use gatepass_core::{RegistrationOrchestrator, AttendanceVerifier, TicketRequest, AttendanceLog};
//!
//! let registration = RegistrationOrchestrator::new(users.clone(), tickets.clone());
//! let ticket = registration
//!     .register_ticket("alice", &TicketRequest::new("A12", "G1"))
//!     .await?;
//!
//! let verifier = AttendanceVerifier::new(tickets, clock);
//! let used = verifier
//!     .log_attendance(&AttendanceLog::new("A12", "G1", "492039"))
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod accounts;
pub mod attendance;
pub mod error;
pub mod gateway;
pub mod metrics;
pub mod policy;
pub mod registration;
pub mod seed;
pub mod service;
pub mod totp;
pub mod types;

pub use accounts::AccountService;
pub use attendance::AttendanceVerifier;
pub use error::{Result, StorageError, TicketError};
pub use gateway::{StorageFuture, TicketRepository, UserRepository};
pub use policy::{AcceptAllTickets, AccountPolicy, TicketPolicy};
pub use registration::RegistrationOrchestrator;
pub use seed::{Seed, SeedError, TotpSecret};
pub use service::TicketService;
pub use totp::{Totp, TotpConfig, TotpConfigError};
pub use types::{AttendanceLog, Ticket, TicketId, TicketRequest, TicketStatus, User, UserId};

/// Environment module - injected dependencies.
///
/// The engine never reads the wall clock directly. Production code passes
/// [`environment::SystemClock`]; tests pass a fixed or manually advanced clock
/// so code derivation is deterministic.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use gatepass_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let before = chrono::Utc::now();
    /// assert!(clock.now() >= before);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock backed by [`Utc::now`].
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
