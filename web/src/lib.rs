//! HTTP surface for the gatepass ticket lifecycle engine.
//!
//! Handlers are thin: parse the request, call [`gatepass_core::TicketService`],
//! map the result. All lifecycle rules live in the engine.
//!
//! # Example
//!
//! ```no_run
//! use gatepass_core::TicketService;
//! use gatepass_core::environment::SystemClock;
//! use gatepass_web::{AppState, build_router};
//! # use gatepass_core::{TicketRepository, UserRepository};
//! use std::sync::Arc;
//!
//! # async fn example<S: UserRepository + TicketRepository + 'static>(store: Arc<S>) -> Result<(), Box<dyn std::error::Error>> {
//! let service = TicketService::new(store, Arc::new(SystemClock));
//! let app = build_router(AppState::new(service));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::AppError;
pub use router::build_router;
pub use state::AppState;
