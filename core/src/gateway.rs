//! Storage gateway capability.
//!
//! The engine reads and writes users and tickets exclusively through these two
//! traits. There is one production implementation (`PostgresStore` in
//! `gatepass-postgres`) and one in-memory fake (`InMemoryStore` in
//! `gatepass-testing`).
//!
//! # Compare-and-swap contract
//!
//! [`TicketRepository::bind_ticket_to_user`] and
//! [`TicketRepository::mark_ticket_used`] must check the guarding state and
//! mutate in one atomic unit, e.g. a conditional `UPDATE … WHERE user_id IS
//! NULL`. When the guard does not hold (another caller won the race) they
//! return `Ok(false)`. Errors are reserved for backend faults.
//!
//! # Dyn Compatibility
//!
//! Methods return explicit `Pin<Box<dyn Future>>` values instead of using
//! `async fn`, so gateways can be injected as `Arc<dyn TicketRepository>`
//! into engine components and shared across request tasks.

use crate::error::StorageError;
use crate::types::{Ticket, TicketId, User};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by every gateway method.
pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// User lookups and account creation.
pub trait UserRepository: Send + Sync {
    /// Find a user by username, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    fn get_user_by_username<'a>(&'a self, username: &'a str) -> StorageFuture<'a, Option<User>>;

    /// Create a user with an opaque credential.
    ///
    /// Returns `false` when nothing was inserted (e.g. the username was taken
    /// concurrently).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    fn create_user<'a>(&'a self, username: &'a str, password: &'a str)
    -> StorageFuture<'a, bool>;
}

/// Ticket lookups and lifecycle transitions.
pub trait TicketRepository: Send + Sync {
    /// Find the non-revoked ticket for a `(seat, gate)` slot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    fn get_ticket_by_seat_gate<'a>(
        &'a self,
        seat: &'a str,
        gate: &'a str,
    ) -> StorageFuture<'a, Option<Ticket>>;

    /// Bind an unbound ticket to a user and assign its seed.
    ///
    /// Returns `false` if the ticket has no identifier, does not exist, is
    /// revoked, or is already bound.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    fn bind_ticket_to_user<'a>(&'a self, user: &'a User, ticket: &'a Ticket)
    -> StorageFuture<'a, bool>;

    /// Transition a bound, valid ticket to `used` and stamp `used_at`.
    ///
    /// Returns `false` if the ticket is missing, unbound, or not `valid`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    fn mark_ticket_used(&self, ticket_id: TicketId) -> StorageFuture<'_, bool>;
}
