use crate::{AuthenticationOutcome, LegacyStoreAccess, MigrationResult};

/// Re-submits a password to the legacy pool's own authentication flow
pub struct PasswordVerifier {
    access: LegacyStoreAccess,
}

impl PasswordVerifier {
    pub fn new(access: LegacyStoreAccess) -> Self {
        Self { access }
    }

    /// `true` only when the legacy pool completed authentication. Every other
    /// outcome is `false`; only failing to reach the pool at all is an error.
    pub async fn verify(&self, username: &str, password: &str) -> MigrationResult<bool> {
        let directory = self.access.directory().await?;

        match directory.authenticate(username, password).await {
            Ok(AuthenticationOutcome::Authenticated) => {
                tracing::info!("Legacy pool authenticated user: {}", username);
                Ok(true)
            }
            Ok(AuthenticationOutcome::ChallengeRequired(challenge)) => {
                tracing::warn!(
                    "Legacy pool asked {} for challenge {} instead of authenticating",
                    username,
                    challenge
                );
                Ok(false)
            }
            Ok(AuthenticationOutcome::Rejected(reason)) => {
                tracing::warn!("Legacy pool rejected {}: {}", username, reason);
                Ok(false)
            }
            Err(e) => {
                tracing::warn!("Password verification for {} failed: {:?}", username, e);
                Ok(false)
            }
        }
    }
}
