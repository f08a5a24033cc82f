//! # Gatepass Testing
//!
//! Testing utilities for the gatepass engine.
//!
//! This crate provides:
//! - [`InMemoryStore`]: a fake storage gateway honoring the compare-and-swap
//!   contract, with fault injection
//! - [`FixedClock`] / [`ManualClock`]: deterministic time
//! - [`fixtures`]: the standard users/tickets scenario and a code helper
//!
//! ## Example
//!
//! ```
//! use gatepass_testing::{fixtures, test_clock};
//! use gatepass_core::{TicketService, TicketRequest};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(fixtures::scenario_store());
//! let service = TicketService::new(store, Arc::new(test_clock()));
//!
//! let ticket = service
//!     .register_ticket("alice", &TicketRequest::new("A12", "G1"))
//!     .await?;
//! assert!(ticket.user_id.is_some());
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Duration, Utc};
use gatepass_core::environment::Clock;

pub mod fixtures;
pub mod store;

pub use store::{Fault, InMemoryStore, Operation};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use gatepass_testing::mocks::FixedClock;
    /// use gatepass_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to.
    ///
    /// Clones share the same time, so a test can hand one clone to the
    /// engine and advance another across a TOTP step boundary.
    ///
    /// ```
    /// use gatepass_testing::mocks::ManualClock;
    /// use gatepass_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = ManualClock::new(Utc::now());
    /// let engine_view = clock.clone();
    /// let before = engine_view.now();
    /// clock.advance(Duration::seconds(60));
    /// assert_eq!(engine_view.now() - before, Duration::seconds(60));
    /// ```
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Create a manual clock starting at `time`.
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward.
        pub fn advance(&self, by: Duration) {
            if let Ok(mut time) = self.time.lock() {
                *time += by;
            }
        }

        /// Jump to an absolute time.
        pub fn set(&self, to: DateTime<Utc>) {
            if let Ok(mut time) = self.time.lock() {
                *time = to;
            }
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
                .lock()
                .map_or_else(|poisoned| *poisoned.into_inner(), |time| *time)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// The instant sits on a 60-second boundary, so codes generated from it
    /// stay valid for the following 59 seconds.
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_instant())
    }

    /// The instant [`test_clock`] is fixed at.
    ///
    /// # Panics
    ///
    /// Never in practice; the timestamp is hardcoded.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_instant() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, ManualClock, test_clock, test_instant};
