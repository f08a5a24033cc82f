//! In-memory storage gateway.
//!
//! [`InMemoryStore`] implements both gateway traits over a single mutex, so
//! every check-and-mutate is atomic just like the conditional updates of the
//! PostgreSQL store. Faults can be injected per operation to exercise the
//! engine's failure translation.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning is the only panic source

use gatepass_core::environment::{Clock, SystemClock};
use gatepass_core::{
    Seed, StorageError, StorageFuture, Ticket, TicketId, TicketRepository, TicketStatus, User,
    UserId, UserRepository,
};
use rand::RngCore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Length of generated seeds in bytes.
pub const SEED_LEN: usize = 32;

/// Gateway operation, used to target injected faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `get_user_by_username`
    GetUser,
    /// `create_user`
    CreateUser,
    /// `get_ticket_by_seat_gate`
    GetTicket,
    /// `bind_ticket_to_user`
    BindTicket,
    /// `mark_ticket_used`
    MarkUsed,
}

/// Injected behaviour for an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Fail with a storage error.
    Error(StorageError),
    /// Succeed without effect: mutations report `false`, lookups report absent.
    NoEffect,
    /// Let the first `n` calls through, then apply the inner fault.
    After(usize, Box<Fault>),
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    tickets: Vec<Ticket>,
    faults: HashMap<Operation, Fault>,
}

impl State {
    /// Resolve the fault for one call, consuming an `After` budget if present.
    fn take_fault(&mut self, op: Operation) -> Option<Fault> {
        let fault = self.faults.get_mut(&op)?;
        if let Fault::After(remaining, inner) = fault {
            if *remaining > 0 {
                *remaining -= 1;
                return None;
            }
            return Some((**inner).clone());
        }
        Some(fault.clone())
    }

    fn find_live(&self, seat: &str, gate: &str) -> Option<&Ticket> {
        self.tickets
            .iter()
            .find(|t| t.seat == seat && t.gate == gate && t.status != TicketStatus::Revoked)
    }

    fn find_by_id_mut(&mut self, id: TicketId) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id == Some(id))
    }

    fn find_user(&self, username: &str) -> Option<&User> {
        self.users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
    }
}

/// In-memory implementation of [`UserRepository`] and [`TicketRepository`].
///
/// Clones share the same data.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    /// Create an empty store stamping times from the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store stamping `created_at`/`used_at` from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            clock,
        }
    }

    /// Add a user and return it.
    pub fn add_user(&self, username: &str) -> User {
        let user = User::new(UserId::new(), username);
        self.state
            .lock()
            .unwrap()
            .users
            .insert(user.id, user.clone());
        user
    }

    /// Provision an unbound, valid ticket for `(seat, gate)`.
    pub fn provision_ticket(&self, seat: &str, gate: &str) -> Ticket {
        let mut ticket = Ticket::unbound(TicketId::new(), seat, gate);
        ticket.created_at = Some(self.clock.now());
        self.insert_ticket(ticket.clone());
        ticket
    }

    /// Insert a ticket exactly as given, bypassing lifecycle rules.
    ///
    /// Used to set up corrupt rows (missing id, bound without seed, ...).
    pub fn insert_ticket(&self, ticket: Ticket) {
        self.state.lock().unwrap().tickets.push(ticket);
    }

    /// Administratively revoke the live ticket at `(seat, gate)`.
    pub fn revoke(&self, seat: &str, gate: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(ticket) = state
            .tickets
            .iter_mut()
            .find(|t| t.seat == seat && t.gate == gate && t.status != TicketStatus::Revoked)
        {
            ticket.status = TicketStatus::Revoked;
        }
    }

    /// Snapshot of the live ticket at `(seat, gate)`.
    #[must_use]
    pub fn ticket(&self, seat: &str, gate: &str) -> Option<Ticket> {
        self.state.lock().unwrap().find_live(seat, gate).cloned()
    }

    /// Snapshot of a user by username.
    #[must_use]
    pub fn user(&self, username: &str) -> Option<User> {
        self.state.lock().unwrap().find_user(username).cloned()
    }

    /// Make `op` misbehave until [`clear_faults`](Self::clear_faults).
    pub fn inject_fault(&self, op: Operation, fault: Fault) {
        self.state.lock().unwrap().faults.insert(op, fault);
    }

    /// Remove all injected faults.
    pub fn clear_faults(&self) {
        self.state.lock().unwrap().faults.clear();
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, StorageError> {
        self.state.lock().map_err(|_| StorageError::Unavailable)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore").finish_non_exhaustive()
    }
}

fn generate_seed() -> Seed {
    let mut bytes = [0u8; SEED_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    Seed::from_bytes(&bytes)
}

impl UserRepository for InMemoryStore {
    fn get_user_by_username<'a>(&'a self, username: &'a str) -> StorageFuture<'a, Option<User>> {
        Box::pin(async move {
            let mut state = self.lock()?;
            match state.take_fault(Operation::GetUser) {
                Some(Fault::Error(e)) => return Err(e),
                Some(_) => return Ok(None),
                None => {}
            }
            Ok(state.find_user(username).cloned())
        })
    }

    fn create_user<'a>(&'a self, username: &'a str, password: &'a str) -> StorageFuture<'a, bool> {
        Box::pin(async move {
            let mut state = self.lock()?;
            match state.take_fault(Operation::CreateUser) {
                Some(Fault::Error(e)) => return Err(e),
                Some(_) => return Ok(false),
                None => {}
            }
            if state.find_user(username).is_some() {
                return Ok(false);
            }
            let mut user = User::new(UserId::new(), username);
            user.password = Some(password.to_string());
            state.users.insert(user.id, user);
            Ok(true)
        })
    }
}

impl TicketRepository for InMemoryStore {
    fn get_ticket_by_seat_gate<'a>(
        &'a self,
        seat: &'a str,
        gate: &'a str,
    ) -> StorageFuture<'a, Option<Ticket>> {
        Box::pin(async move {
            let mut state = self.lock()?;
            match state.take_fault(Operation::GetTicket) {
                Some(Fault::Error(e)) => return Err(e),
                Some(_) => return Ok(None),
                None => {}
            }
            Ok(state.find_live(seat, gate).cloned())
        })
    }

    fn bind_ticket_to_user<'a>(
        &'a self,
        user: &'a User,
        ticket: &'a Ticket,
    ) -> StorageFuture<'a, bool> {
        Box::pin(async move {
            let mut state = self.lock()?;
            match state.take_fault(Operation::BindTicket) {
                Some(Fault::Error(e)) => return Err(e),
                Some(_) => return Ok(false),
                None => {}
            }
            let Some(id) = ticket.id else {
                return Ok(false);
            };
            match state.find_by_id_mut(id) {
                Some(stored)
                    if stored.user_id.is_none() && stored.status != TicketStatus::Revoked =>
                {
                    stored.user_id = Some(user.id);
                    stored.seed = Some(generate_seed());
                    Ok(true)
                }
                _ => Ok(false),
            }
        })
    }

    fn mark_ticket_used(&self, ticket_id: TicketId) -> StorageFuture<'_, bool> {
        Box::pin(async move {
            let now = self.clock.now();
            let mut state = self.lock()?;
            match state.take_fault(Operation::MarkUsed) {
                Some(Fault::Error(e)) => return Err(e),
                Some(_) => return Ok(false),
                None => {}
            }
            match state.find_by_id_mut(ticket_id) {
                Some(stored)
                    if stored.user_id.is_some() && stored.status == TicketStatus::Valid =>
                {
                    stored.status = TicketStatus::Used;
                    stored.used_at = Some(now);
                    Ok(true)
                }
                _ => Ok(false),
            }
        })
    }
}
