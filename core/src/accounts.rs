//! Account creation.

use crate::error::{Result, TicketError};
use crate::gateway::UserRepository;
use crate::metrics;
use crate::policy::AccountPolicy;
use crate::types::User;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Creates user accounts that tickets can later be registered to.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    policy: AccountPolicy,
}

impl AccountService {
    /// Create an account service.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            policy: AccountPolicy,
        }
    }

    /// Create a user and return the stored record.
    ///
    /// # Errors
    ///
    /// - [`TicketError::InvalidUserDetails`] if the username or password
    ///   breaks the account policy
    /// - [`TicketError::UsernameTaken`] if the username exists
    /// - [`TicketError::UserCreationFailed`] if storage fails or the insert
    ///   does not take effect
    pub async fn create_user(&self, username: &str, password: &str) -> Result<User> {
        let result = self.create(username, password).await;
        metrics::record_account(&result);
        result
    }

    async fn create(&self, username: &str, password: &str) -> Result<User> {
        if let Err(reason) = self.policy.validate(username, password) {
            warn!(username, reason = %reason, "Account creation failed: invalid details");
            return Err(TicketError::InvalidUserDetails { reason });
        }

        let existing = self
            .users
            .get_user_by_username(username)
            .await
            .map_err(|e| creation_failure(&e))?;
        if existing.is_some() {
            info!(username, "Account creation rejected: username taken");
            return Err(TicketError::UsernameTaken);
        }

        let created = self
            .users
            .create_user(username, password)
            .await
            .map_err(|e| creation_failure(&e))?;
        if !created {
            warn!(username, "Account creation failed: insert affected no rows");
            return Err(TicketError::UserCreationFailed {
                reason: "user was not created".to_string(),
            });
        }

        let user = self
            .users
            .get_user_by_username(username)
            .await
            .map_err(|e| creation_failure(&e))?
            .ok_or_else(|| TicketError::UserCreationFailed {
                reason: "user missing after insert".to_string(),
            })?;

        info!(username, user_id = %user.id, "Account created");
        Ok(user)
    }
}

fn creation_failure(e: &crate::error::StorageError) -> TicketError {
    error!(error = %e, "Storage error while creating user");
    TicketError::UserCreationFailed {
        reason: e.to_string(),
    }
}
