//! Account creation tests.

#![allow(clippy::unwrap_used)] // Test code uses unwrap for clear failure messages
#![allow(clippy::panic)] // Tests are allowed to panic on failures

use gatepass_core::{StorageError, TicketError, TicketRequest, TicketService};
use gatepass_testing::{Fault, InMemoryStore, Operation, test_clock};
use std::sync::Arc;

const PASSWORD: &str = "Str0ng_pass";

fn service() -> (Arc<InMemoryStore>, TicketService) {
    let store = Arc::new(InMemoryStore::new());
    store.provision_ticket("A12", "G1");
    let service = TicketService::new(store.clone(), Arc::new(test_clock()));
    (store, service)
}

#[tokio::test]
async fn created_user_can_register_tickets() {
    let (store, service) = service();

    let user = service.create_user("juan_perez", PASSWORD).await.unwrap();
    assert_eq!(user.username, "juan_perez");

    let ticket = service
        .register_ticket("juan_perez", &TicketRequest::new("A12", "G1"))
        .await
        .unwrap();
    assert_eq!(ticket.user_id, Some(user.id));
    assert_eq!(store.user("juan_perez").unwrap().id, user.id);
}

#[tokio::test]
async fn duplicate_username_is_rejected_case_insensitively() {
    let (_store, service) = service();
    service.create_user("Alice", PASSWORD).await.unwrap();

    assert_eq!(
        service.create_user("alice", PASSWORD).await,
        Err(TicketError::UsernameTaken)
    );
}

#[tokio::test]
async fn policy_violations_are_user_errors() {
    let (store, service) = service();

    for (username, password) in [
        ("al", PASSWORD),
        ("bad name", PASSWORD),
        ("alice", "Sh0rt_a"),
        ("alice", "nouppercase1_"),
        ("alice", "NoSpecial123"),
    ] {
        let result = service.create_user(username, password).await;
        let Err(error) = result else {
            panic!("{username}/{password} should be rejected");
        };
        assert!(
            matches!(error, TicketError::InvalidUserDetails { .. }),
            "{username}/{password}: {error:?}"
        );
        assert!(error.is_user_error());
    }
    assert!(store.user("alice").is_none());
}

#[tokio::test]
async fn insert_without_effect_is_a_failure() {
    let (store, service) = service();
    store.inject_fault(Operation::CreateUser, Fault::NoEffect);

    let result = service.create_user("alice", PASSWORD).await;

    assert!(matches!(result, Err(TicketError::UserCreationFailed { .. })));
    assert!(store.user("alice").is_none());
}

#[tokio::test]
async fn storage_errors_are_translated() {
    for op in [Operation::GetUser, Operation::CreateUser] {
        let (store, service) = service();
        store.inject_fault(op, Fault::Error(StorageError::Unavailable));

        let result = service.create_user("alice", PASSWORD).await;

        assert!(
            matches!(result, Err(TicketError::UserCreationFailed { .. })),
            "{op:?}: {result:?}"
        );
    }
}
