//! Validation policies for ticket requests and new accounts.

use crate::types::TicketRequest;
use regex::Regex;
use std::sync::LazyLock;

/// Event-specific rules a ticket request must satisfy before registration.
///
/// Implementations return the reason for rejection, which is reported back as
/// `TicketError::InvalidTicketDetails`.
pub trait TicketPolicy: Send + Sync {
    /// Validate a ticket request.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the request is rejected.
    fn validate(&self, request: &TicketRequest) -> Result<(), String>;
}

/// Policy that accepts every request.
///
/// Used until an event defines its own seat/gate rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllTickets;

impl TicketPolicy for AcceptAllTickets {
    fn validate(&self, _request: &TicketRequest) -> Result<(), String> {
        Ok(())
    }
}

static USERNAME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,20}$").ok());

const PASSWORD_SPECIALS: &str = "@$!%*?&_-";
const MIN_PASSWORD_LEN: usize = 8;

/// Username and password rules for account creation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountPolicy;

impl AccountPolicy {
    /// Validate a username/password pair, reporting the first rule that fails.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the pair is rejected.
    pub fn validate(&self, username: &str, password: &str) -> Result<(), String> {
        if username.is_empty() {
            return Err("Missing username".to_string());
        }
        if password.is_empty() {
            return Err("Missing password".to_string());
        }

        let username_ok = USERNAME_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(username));
        if !username_ok {
            return Err(
                "Username may only contain letters, digits, '-' and '_' and must be 3 to 20 characters long"
                    .to_string(),
            );
        }

        Self::validate_password(password)
    }

    fn validate_password(password: &str) -> Result<(), String> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long"
            ));
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err("Password must include a lowercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err("Password must include an uppercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err("Password must include a digit".to_string());
        }
        if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
            return Err(format!(
                "Password must include a special character ({PASSWORD_SPECIALS})"
            ));
        }
        if !password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c))
        {
            return Err("Password contains unsupported characters".to_string());
        }
        Ok(())
    }
}
