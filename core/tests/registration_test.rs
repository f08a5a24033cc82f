//! Registration orchestrator tests against the in-memory gateway.

#![allow(clippy::unwrap_used)] // Test code uses unwrap for clear failure messages
#![allow(clippy::panic)] // Tests are allowed to panic on failures

use gatepass_core::{
    RegistrationOrchestrator, StorageError, TicketError, TicketPolicy, TicketRepository,
    TicketRequest, TicketStatus, UserRepository,
};
use gatepass_testing::{Fault, InMemoryStore, Operation, fixtures};
use std::sync::Arc;

fn orchestrator(store: &Arc<InMemoryStore>) -> RegistrationOrchestrator {
    let users: Arc<dyn UserRepository> = store.clone();
    let tickets: Arc<dyn TicketRepository> = store.clone();
    RegistrationOrchestrator::new(users, tickets)
}

fn a12() -> TicketRequest {
    TicketRequest::new("A12", "G1")
}

#[tokio::test]
async fn registers_unbound_ticket_to_existing_user() {
    let store = Arc::new(fixtures::scenario_store());
    let alice = store.user("alice").unwrap();

    let ticket = orchestrator(&store)
        .register_ticket("alice", &a12())
        .await
        .unwrap();

    assert_eq!(ticket.user_id, Some(alice.id));
    assert_eq!(ticket.status, TicketStatus::Valid);
    assert!(ticket.seed.is_some(), "storage assigns the seed at bind time");
    assert!(ticket.used_at.is_none());
    assert_eq!(store.ticket("A12", "G1").unwrap(), ticket);
}

#[tokio::test]
async fn second_registration_is_rejected_for_any_user() {
    let store = Arc::new(fixtures::scenario_store());
    let registration = orchestrator(&store);
    let first = registration.register_ticket("alice", &a12()).await.unwrap();

    assert_eq!(
        registration.register_ticket("alice", &a12()).await,
        Err(TicketError::AlreadyRegistered)
    );
    assert_eq!(
        registration.register_ticket("juanperez", &a12()).await,
        Err(TicketError::AlreadyRegistered)
    );

    let stored = store.ticket("A12", "G1").unwrap();
    assert_eq!(stored.user_id, first.user_id);
    assert_eq!(stored.seed, first.seed, "seed is not regenerated");
}

#[tokio::test]
async fn unknown_user_is_rejected() {
    let store = Arc::new(fixtures::scenario_store());

    let result = orchestrator(&store).register_ticket("ghost", &a12()).await;

    assert_eq!(
        result,
        Err(TicketError::UserNotFound {
            username: "ghost".to_string()
        })
    );
    assert!(store.ticket("A12", "G1").unwrap().user_id.is_none());
}

#[tokio::test]
async fn empty_username_never_reaches_storage() {
    let store = Arc::new(fixtures::scenario_store());
    store.inject_fault(
        Operation::GetUser,
        Fault::Error(StorageError::Database("must not be called".to_string())),
    );

    let result = orchestrator(&store).register_ticket("", &a12()).await;

    assert!(matches!(result, Err(TicketError::UserNotFound { .. })));
}

#[tokio::test]
async fn username_lookup_is_case_insensitive() {
    let store = Arc::new(fixtures::scenario_store());
    let alice = store.user("alice").unwrap();

    let ticket = orchestrator(&store)
        .register_ticket("ALICE", &a12())
        .await
        .unwrap();

    assert_eq!(ticket.user_id, Some(alice.id));
}

#[tokio::test]
async fn tickets_are_never_created_by_registration() {
    let store = Arc::new(fixtures::scenario_store());

    let result = orchestrator(&store)
        .register_ticket("alice", &TicketRequest::new("B05", "G12"))
        .await;

    assert_eq!(result, Err(TicketError::TicketNotFound));
    assert!(store.ticket("B05", "G12").is_none());
}

#[tokio::test]
async fn revoked_ticket_cannot_be_registered() {
    let store = Arc::new(fixtures::scenario_store());
    store.revoke("A12", "G1");

    let result = orchestrator(&store).register_ticket("alice", &a12()).await;

    assert_eq!(result, Err(TicketError::TicketNotFound));
}

struct GateOnly(&'static str);

impl TicketPolicy for GateOnly {
    fn validate(&self, request: &TicketRequest) -> Result<(), String> {
        if request.gate == self.0 {
            Ok(())
        } else {
            Err(format!("gate {} is closed", request.gate))
        }
    }
}

#[tokio::test]
async fn policy_rejection_happens_before_ticket_lookup() {
    let store = Arc::new(fixtures::scenario_store());
    store.inject_fault(
        Operation::GetTicket,
        Fault::Error(StorageError::Database("must not be called".to_string())),
    );
    let registration = orchestrator(&store).with_policy(Arc::new(GateOnly("G9")));

    let result = registration.register_ticket("alice", &a12()).await;

    assert_eq!(
        result,
        Err(TicketError::InvalidTicketDetails {
            reason: "gate G1 is closed".to_string()
        })
    );
}

#[tokio::test]
async fn user_check_precedes_policy() {
    let store = Arc::new(fixtures::scenario_store());
    let registration = orchestrator(&store).with_policy(Arc::new(GateOnly("G9")));

    let result = registration.register_ticket("ghost", &a12()).await;

    assert!(matches!(result, Err(TicketError::UserNotFound { .. })));
}

#[tokio::test]
async fn bind_without_effect_is_a_failure() {
    let store = Arc::new(fixtures::scenario_store());
    store.inject_fault(Operation::BindTicket, Fault::NoEffect);

    let result = orchestrator(&store).register_ticket("alice", &a12()).await;

    assert!(matches!(result, Err(TicketError::RegistrationFailed { .. })));
    assert!(store.ticket("A12", "G1").unwrap().user_id.is_none());
}

#[tokio::test]
async fn bind_storage_error_is_translated() {
    let store = Arc::new(fixtures::scenario_store());
    store.inject_fault(
        Operation::BindTicket,
        Fault::Error(StorageError::Database("connection reset".to_string())),
    );

    let result = orchestrator(&store).register_ticket("alice", &a12()).await;

    let Err(TicketError::RegistrationFailed { reason }) = result else {
        panic!("expected RegistrationFailed, got {result:?}");
    };
    assert!(reason.contains("connection reset"));
}

#[tokio::test]
async fn missing_post_state_is_a_failure() {
    let store = Arc::new(fixtures::scenario_store());
    store.inject_fault(
        Operation::GetTicket,
        Fault::After(1, Box::new(Fault::NoEffect)),
    );

    let result = orchestrator(&store).register_ticket("alice", &a12()).await;

    assert!(matches!(result, Err(TicketError::RegistrationFailed { .. })));
}

#[tokio::test]
async fn lookup_storage_errors_are_translated() {
    for op in [Operation::GetUser, Operation::GetTicket] {
        let store = Arc::new(fixtures::scenario_store());
        store.inject_fault(op, Fault::Error(StorageError::Unavailable));

        let result = orchestrator(&store).register_ticket("alice", &a12()).await;

        assert!(
            matches!(result, Err(TicketError::RegistrationFailed { .. })),
            "{op:?}: {result:?}"
        );
    }
}
