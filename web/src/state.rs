//! Application state for Axum handlers.

use gatepass_core::TicketService;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request by axum; [`TicketService`] only holds `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Engine entry points
    pub service: TicketService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(service: TicketService) -> Self {
        Self { service }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
