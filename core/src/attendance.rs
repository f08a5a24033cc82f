//! Attendance verifier: checks a TOTP code at the gate and consumes the ticket.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! ```text
//! 1. Find ticket by (seat, gate) → TicketNotFound
//! 2. Has an id?                  → TicketMissingId
//! 3. Bound to a user?            → NotRegistered
//! 4. Status is valid?            → InvalidStatus
//! 5. Has a seed?                 → MissingSeed (InvalidSeed if undecodable)
//! 6. Code matches current step?  → InvalidCode
//! 7. Mark used + re-fetch        → AttendanceUpdateFailed
//! ```

use crate::environment::Clock;
use crate::error::{Result, StorageError, TicketError};
use crate::gateway::TicketRepository;
use crate::metrics;
use crate::totp::{Totp, TotpConfig};
use crate::types::{AttendanceLog, Ticket, TicketId};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Validates gate codes and performs the `valid → used` transition.
#[derive(Clone)]
pub struct AttendanceVerifier {
    tickets: Arc<dyn TicketRepository>,
    clock: Arc<dyn Clock>,
    totp: TotpConfig,
}

impl AttendanceVerifier {
    /// Create a verifier with a 60-second step and no drift tolerance.
    #[must_use]
    pub fn new(tickets: Arc<dyn TicketRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tickets,
            clock,
            totp: TotpConfig::default(),
        }
    }

    /// Replace the TOTP parameters, normalizing out-of-range values.
    #[must_use]
    pub fn with_totp_config(mut self, config: TotpConfig) -> Self {
        self.totp = config.normalized();
        self
    }

    /// TOTP parameters in use.
    #[must_use]
    pub const fn totp_config(&self) -> TotpConfig {
        self.totp
    }

    /// Verify `attendance.totp_code` and mark the ticket used.
    ///
    /// On success the returned ticket is the post-transition state read back
    /// from storage: `status` is `used` and `used_at` is set.
    ///
    /// # Errors
    ///
    /// - [`TicketError::TicketNotFound`] if no non-revoked ticket matches
    /// - [`TicketError::TicketMissingId`] if the stored ticket has no id
    /// - [`TicketError::NotRegistered`] if the ticket is unbound
    /// - [`TicketError::InvalidStatus`] if the ticket is not `valid`
    /// - [`TicketError::MissingSeed`] / [`TicketError::InvalidSeed`] if the
    ///   seed is absent or undecodable
    /// - [`TicketError::InvalidCode`] if the code does not match
    /// - [`TicketError::AttendanceUpdateFailed`] if storage fails or the
    ///   transition does not take effect
    pub async fn log_attendance(&self, attendance: &AttendanceLog) -> Result<Ticket> {
        info!(
            seat = %attendance.seat,
            gate = %attendance.gate,
            "Attendance attempt"
        );

        let result = self.verify_and_consume(attendance).await;
        metrics::record_attendance(&result);
        result
    }

    async fn verify_and_consume(&self, attendance: &AttendanceLog) -> Result<Ticket> {
        let ticket = self
            .tickets
            .get_ticket_by_seat_gate(&attendance.seat, &attendance.gate)
            .await
            .map_err(|e| storage_failure("ticket lookup", &e))?
            .ok_or_else(|| {
                warn!(
                    seat = %attendance.seat,
                    gate = %attendance.gate,
                    "Attendance failed: no ticket found"
                );
                TicketError::TicketNotFound
            })?;

        let ticket_id = Self::check_admissible(&ticket, attendance)?;
        self.check_code(&ticket, ticket_id, &attendance.totp_code)?;
        self.consume(ticket_id, attendance).await
    }

    fn check_admissible(ticket: &Ticket, attendance: &AttendanceLog) -> Result<TicketId> {
        let Some(ticket_id) = ticket.id else {
            error!(
                seat = %attendance.seat,
                gate = %attendance.gate,
                "Attendance failed: ticket has no ID"
            );
            return Err(TicketError::TicketMissingId);
        };

        if ticket.user_id.is_none() {
            warn!(%ticket_id, "Attendance failed: ticket is not registered to a user");
            return Err(TicketError::NotRegistered);
        }

        if !ticket.is_admissible() {
            warn!(%ticket_id, status = %ticket.status, "Attendance failed: invalid ticket status");
            return Err(TicketError::InvalidStatus {
                status: ticket.status,
            });
        }

        if ticket.seed.is_none() {
            error!(%ticket_id, "Attendance failed: registered ticket has no seed");
            return Err(TicketError::MissingSeed);
        }

        Ok(ticket_id)
    }

    fn check_code(&self, ticket: &Ticket, ticket_id: TicketId, code: &str) -> Result<()> {
        let seed = ticket.seed.as_ref().ok_or(TicketError::MissingSeed)?;
        let totp = Totp::from_seed(seed, self.totp).map_err(|e| {
            error!(%ticket_id, error = %e, "Attendance failed: ticket seed is malformed");
            TicketError::InvalidSeed
        })?;

        if !totp.verify(code, self.clock.now()) {
            error!(
                %ticket_id,
                fraud_signal = true,
                "Attendance rejected: invalid TOTP code (possible fraud attempt)"
            );
            return Err(TicketError::InvalidCode);
        }
        Ok(())
    }

    async fn consume(&self, ticket_id: TicketId, attendance: &AttendanceLog) -> Result<Ticket> {
        let updated = self
            .tickets
            .mark_ticket_used(ticket_id)
            .await
            .map_err(|e| storage_failure("mark used", &e))?;

        if !updated {
            warn!(%ticket_id, "Attendance failed: ticket state was not updated");
            return Err(TicketError::AttendanceUpdateFailed {
                reason: format!("ticket {ticket_id} was not marked as used"),
            });
        }

        let used = self
            .tickets
            .get_ticket_by_seat_gate(&attendance.seat, &attendance.gate)
            .await
            .map_err(|e| storage_failure("post-update lookup", &e))?
            .ok_or_else(|| {
                error!(%ticket_id, "Attendance failed: ticket missing after update");
                TicketError::AttendanceUpdateFailed {
                    reason: format!("ticket {ticket_id} missing after update"),
                }
            })?;

        info!(
            %ticket_id,
            user_id = ?used.user_id,
            "Attendance success: ticket marked as used"
        );
        Ok(used)
    }
}

fn storage_failure(operation: &str, e: &StorageError) -> TicketError {
    error!(operation, error = %e, "Storage error while logging attendance");
    TicketError::AttendanceUpdateFailed {
        reason: format!("{operation} failed: {e}"),
    }
}
