use async_trait::async_trait;
use std::sync::Arc;

use crate::{LegacyStoreAccess, LegacyUserRecord, LookupStrategy, MigrationError, MigrationResult};

/// Finds the legacy record for the identifier a user signed in with
#[async_trait]
pub trait UserLocator: Send + Sync {
    /// `Err(MigrationError::UserNotFound)` when no legacy user matches
    async fn locate(&self, username_or_email: &str) -> MigrationResult<LegacyUserRecord>;
}

/// Direct AdminGetUser lookup on the exact username
pub struct UsernameLocator {
    access: LegacyStoreAccess,
}

impl UsernameLocator {
    pub fn new(access: LegacyStoreAccess) -> Self {
        Self { access }
    }
}

#[async_trait]
impl UserLocator for UsernameLocator {
    async fn locate(&self, username: &str) -> MigrationResult<LegacyUserRecord> {
        let directory = self.access.directory().await?;
        directory
            .get_user(username)
            .await?
            .ok_or_else(|| MigrationError::UserNotFound(username.to_string()))
    }
}

/// ListUsers search on the email attribute; the first match wins
pub struct EmailLocator {
    access: LegacyStoreAccess,
}

impl EmailLocator {
    pub fn new(access: LegacyStoreAccess) -> Self {
        Self { access }
    }
}

#[async_trait]
impl UserLocator for EmailLocator {
    async fn locate(&self, email: &str) -> MigrationResult<LegacyUserRecord> {
        let directory = self.access.directory().await?;
        let matches = directory.find_users_by_email(email).await?;
        if matches.len() > 1 {
            tracing::warn!(
                "{} legacy users share the email {}, using the first",
                matches.len(),
                email
            );
        }
        matches
            .into_iter()
            .next()
            .ok_or_else(|| MigrationError::UserNotFound(email.to_string()))
    }
}

/// Pick the locator for the configured lookup strategy
pub fn locator_for(strategy: LookupStrategy, access: LegacyStoreAccess) -> Arc<dyn UserLocator> {
    match strategy {
        LookupStrategy::Username => Arc::new(UsernameLocator::new(access)),
        LookupStrategy::Email => Arc::new(EmailLocator::new(access)),
    }
}
