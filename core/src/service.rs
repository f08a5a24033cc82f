//! Facade bundling the engine entry points over one shared gateway.

use crate::accounts::AccountService;
use crate::attendance::AttendanceVerifier;
use crate::environment::Clock;
use crate::error::Result;
use crate::gateway::{TicketRepository, UserRepository};
use crate::policy::TicketPolicy;
use crate::registration::RegistrationOrchestrator;
use crate::totp::TotpConfig;
use crate::types::{AttendanceLog, Ticket, TicketRequest, User};
use std::sync::Arc;

/// Registration, attendance, and accounts over the same storage gateway.
///
/// Cheap to clone; every component holds `Arc`s only. The components never
/// call each other.
#[derive(Clone)]
pub struct TicketService {
    registration: RegistrationOrchestrator,
    attendance: AttendanceVerifier,
    accounts: AccountService,
}

impl TicketService {
    /// Build all components from one store implementing both gateway traits.
    #[must_use]
    pub fn new<S>(store: Arc<S>, clock: Arc<dyn Clock>) -> Self
    where
        S: UserRepository + TicketRepository + 'static,
    {
        let users: Arc<dyn UserRepository> = store.clone();
        let tickets: Arc<dyn TicketRepository> = store;
        Self {
            registration: RegistrationOrchestrator::new(users.clone(), tickets.clone()),
            attendance: AttendanceVerifier::new(tickets, clock),
            accounts: AccountService::new(users),
        }
    }

    /// Replace the ticket validation policy.
    #[must_use]
    pub fn with_ticket_policy(mut self, policy: Arc<dyn TicketPolicy>) -> Self {
        self.registration = self.registration.with_policy(policy);
        self
    }

    /// Replace the TOTP parameters.
    #[must_use]
    pub fn with_totp_config(mut self, config: TotpConfig) -> Self {
        self.attendance = self.attendance.with_totp_config(config);
        self
    }

    /// See [`RegistrationOrchestrator::register_ticket`].
    ///
    /// # Errors
    ///
    /// Propagates the orchestrator's typed errors.
    pub async fn register_ticket(&self, username: &str, request: &TicketRequest) -> Result<Ticket> {
        self.registration.register_ticket(username, request).await
    }

    /// See [`AttendanceVerifier::log_attendance`].
    ///
    /// # Errors
    ///
    /// Propagates the verifier's typed errors.
    pub async fn log_attendance(&self, attendance: &AttendanceLog) -> Result<Ticket> {
        self.attendance.log_attendance(attendance).await
    }

    /// See [`AccountService::create_user`].
    ///
    /// # Errors
    ///
    /// Propagates the account service's typed errors.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<User> {
        self.accounts.create_user(username, password).await
    }
}
