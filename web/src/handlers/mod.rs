//! HTTP request handlers.

pub mod health;
pub mod tickets;
pub mod users;

pub use health::health_check;
pub use tickets::{TicketView, log_attendance, register_ticket};
pub use users::{CreateUserRequest, create_user};
