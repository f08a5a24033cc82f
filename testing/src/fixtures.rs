//! Standard test scenario.
//!
//! | Users | Tickets (unbound, valid) |
//! |---|---|
//! | `alice`, `juanperez` | `(A12, G1)`, `(B05, G2)` |

use crate::store::InMemoryStore;
use chrono::{DateTime, Utc};
use gatepass_core::{Seed, Totp, TotpConfig};

/// Store holding the standard users and tickets.
#[must_use]
pub fn scenario_store() -> InMemoryStore {
    populate(InMemoryStore::new())
}

/// Add the standard users and tickets to `store`.
#[must_use]
pub fn populate(store: InMemoryStore) -> InMemoryStore {
    store.add_user("alice");
    store.add_user("juanperez");
    store.provision_ticket("A12", "G1");
    store.provision_ticket("B05", "G2");
    store
}

/// Code a holder's device would display for `seed` at `at`, with the default
/// 60-second step.
///
/// # Panics
///
/// Panics if the seed is not valid base64.
#[must_use]
#[allow(clippy::expect_used)]
pub fn code_for(seed: &Seed, at: DateTime<Utc>) -> String {
    Totp::from_seed(seed, TotpConfig::default())
        .expect("fixture seed should decode")
        .generate(at)
}
