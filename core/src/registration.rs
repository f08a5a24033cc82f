//! Registration orchestrator: binds a provisioned ticket to a user, once.
//!
//! # Flow
//!
//! ```text
//! 1. Resolve username            → UserNotFound
//! 2. Ticket policy               → InvalidTicketDetails
//! 3. Find ticket by (seat, gate) → TicketNotFound
//! 4. Already bound?              → AlreadyRegistered
//! 5. Bind + re-fetch             → RegistrationFailed
//! ```
//!
//! Step 5 is the engine's half of a compare-and-swap: the gateway's guarded
//! update decides the winner when several callers pass step 4 concurrently,
//! and a `false` result is always a failure.

use crate::error::{Result, StorageError, TicketError};
use crate::gateway::{TicketRepository, UserRepository};
use crate::metrics;
use crate::policy::{AcceptAllTickets, TicketPolicy};
use crate::types::{Ticket, TicketRequest, User};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Binds unassigned tickets to existing users.
#[derive(Clone)]
pub struct RegistrationOrchestrator {
    users: Arc<dyn UserRepository>,
    tickets: Arc<dyn TicketRepository>,
    policy: Arc<dyn TicketPolicy>,
}

impl RegistrationOrchestrator {
    /// Create an orchestrator that accepts every ticket request.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, tickets: Arc<dyn TicketRepository>) -> Self {
        Self {
            users,
            tickets,
            policy: Arc::new(AcceptAllTickets),
        }
    }

    /// Replace the ticket validation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn TicketPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Bind the ticket at `(request.seat, request.gate)` to `username`.
    ///
    /// On success the returned ticket is the post-bind state read back from
    /// storage: `user_id` is the resolved user and `status` is `valid`.
    ///
    /// # Errors
    ///
    /// - [`TicketError::UserNotFound`] if the username does not resolve
    /// - [`TicketError::InvalidTicketDetails`] if the policy rejects the request
    /// - [`TicketError::TicketNotFound`] if no non-revoked ticket matches
    /// - [`TicketError::AlreadyRegistered`] if the ticket is already bound
    /// - [`TicketError::RegistrationFailed`] if storage fails or the bind
    ///   does not take effect
    pub async fn register_ticket(&self, username: &str, request: &TicketRequest) -> Result<Ticket> {
        info!(
            seat = %request.seat,
            gate = %request.gate,
            username,
            "Attempting to register ticket"
        );

        let result = self.register(username, request).await;
        metrics::record_registration(&result);
        result
    }

    async fn register(&self, username: &str, request: &TicketRequest) -> Result<Ticket> {
        let user = self.resolve_user(username).await?;

        if let Err(reason) = self.policy.validate(request) {
            warn!(
                seat = %request.seat,
                gate = %request.gate,
                reason = %reason,
                "Registration failed: invalid ticket details"
            );
            return Err(TicketError::InvalidTicketDetails { reason });
        }

        let ticket = self
            .tickets
            .get_ticket_by_seat_gate(&request.seat, &request.gate)
            .await
            .map_err(|e| storage_failure("ticket lookup", &e))?
            .ok_or_else(|| {
                warn!(
                    seat = %request.seat,
                    gate = %request.gate,
                    "Registration failed: ticket does not exist"
                );
                TicketError::TicketNotFound
            })?;

        if let Some(owner) = ticket.user_id {
            info!(
                ticket_id = ?ticket.id,
                owner = %owner,
                "Registration rejected: ticket is already registered"
            );
            return Err(TicketError::AlreadyRegistered);
        }

        self.bind(&user, &ticket, request).await
    }

    async fn resolve_user(&self, username: &str) -> Result<User> {
        if username.is_empty() {
            warn!("Registration failed: empty username");
            return Err(TicketError::UserNotFound {
                username: String::new(),
            });
        }

        self.users
            .get_user_by_username(username)
            .await
            .map_err(|e| storage_failure("user lookup", &e))?
            .ok_or_else(|| {
                warn!(username, "Registration failed: user does not exist");
                TicketError::UserNotFound {
                    username: username.to_string(),
                }
            })
    }

    async fn bind(&self, user: &User, ticket: &Ticket, request: &TicketRequest) -> Result<Ticket> {
        let bound = self
            .tickets
            .bind_ticket_to_user(user, ticket)
            .await
            .map_err(|e| storage_failure("bind", &e))?;

        if !bound {
            warn!(
                ticket_id = ?ticket.id,
                user_id = %user.id,
                "Registration failed: bind affected no ticket"
            );
            return Err(TicketError::RegistrationFailed {
                reason: "ticket was not bound".to_string(),
            });
        }

        let registered = self
            .tickets
            .get_ticket_by_seat_gate(&request.seat, &request.gate)
            .await
            .map_err(|e| storage_failure("post-bind lookup", &e))?
            .ok_or_else(|| {
                error!(
                    ticket_id = ?ticket.id,
                    "Registration failed: ticket missing after bind"
                );
                TicketError::RegistrationFailed {
                    reason: "ticket missing after bind".to_string(),
                }
            })?;

        info!(
            ticket_id = ?registered.id,
            user_id = %user.id,
            "Ticket successfully registered"
        );
        Ok(registered)
    }
}

fn storage_failure(operation: &str, e: &StorageError) -> TicketError {
    error!(operation, error = %e, "Storage error while registering ticket");
    TicketError::RegistrationFailed {
        reason: format!("{operation} failed: {e}"),
    }
}
