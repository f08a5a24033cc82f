//! Engine metrics.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `gatepass_registrations_total{outcome}` - Registration calls by outcome
//! - `gatepass_attendance_total{outcome}` - Attendance calls by outcome
//! - `gatepass_accounts_total{outcome}` - Account creation calls by outcome
//!
//! `outcome` is `succeeded` or the lowercase error kind. Invalid TOTP codes show
//! up as `gatepass_attendance_total{outcome="invalid_code"}`.

use crate::error::TicketError;
use metrics::describe_counter;

/// Register metric descriptions. Call once at startup.
pub fn register_metrics() {
    describe_counter!(
        "gatepass_registrations_total",
        "Ticket registration calls by outcome"
    );
    describe_counter!(
        "gatepass_attendance_total",
        "Attendance verification calls by outcome"
    );
    describe_counter!(
        "gatepass_accounts_total",
        "Account creation calls by outcome"
    );
}

/// Record the outcome of a registration call.
pub fn record_registration<T>(result: &Result<T, TicketError>) {
    metrics::counter!("gatepass_registrations_total", "outcome" => outcome(result)).increment(1);
}

/// Record the outcome of an attendance call.
pub fn record_attendance<T>(result: &Result<T, TicketError>) {
    metrics::counter!("gatepass_attendance_total", "outcome" => outcome(result)).increment(1);
}

/// Record the outcome of an account creation call.
pub fn record_account<T>(result: &Result<T, TicketError>) {
    metrics::counter!("gatepass_accounts_total", "outcome" => outcome(result)).increment(1);
}

fn outcome<T>(result: &Result<T, TicketError>) -> String {
    match result {
        Ok(_) => "succeeded".to_string(),
        Err(e) => e.kind().to_ascii_lowercase(),
    }
}
