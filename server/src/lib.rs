//! Gatepass deployable: configuration, server wiring, and the TOTP client.
//!
//! # Usage
//!
//! ```bash
//! # Run the server against the database in DATABASE_URL
//! cargo run --bin gatepass-server
//!
//! # Show the code a ticket holder's device would display
//! cargo run --bin gatepass-totp -- <seed-base64>
//! ```

pub mod app;
pub mod client;
pub mod config;

pub use config::Config;
