use async_trait::async_trait;
use aws_sdk_sts::Client as StsClient;
use chrono::{DateTime, Utc};

use crate::{MigrationError, MigrationResult, TemporaryCredentials};

/// Issues short-lived credentials for the legacy user pool
#[async_trait]
pub trait CredentialBroker: Send + Sync {
    async fn assume_access(&self) -> MigrationResult<TemporaryCredentials>;
}

pub struct StsCredentialBroker {
    client: StsClient,
    role_arn: String,
    session_name: String,
}

impl StsCredentialBroker {
    pub fn new(client: StsClient, role_arn: String, session_name: String) -> Self {
        Self {
            client,
            role_arn,
            session_name,
        }
    }
}

#[async_trait]
impl CredentialBroker for StsCredentialBroker {
    /// One AssumeRole round-trip; the result is never cached
    async fn assume_access(&self) -> MigrationResult<TemporaryCredentials> {
        tracing::info!(
            "Assuming role {} with session {}",
            self.role_arn,
            self.session_name
        );

        let output = self
            .client
            .assume_role()
            .role_arn(&self.role_arn)
            .role_session_name(&self.session_name)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    "AssumeRole failed: {}",
                    aws_sdk_sts::error::DisplayErrorContext(&e)
                );
                aws_sdk_sts::Error::from(e)
            })?;

        let credentials = credentials_from_sts(output.credentials)?;
        tracing::info!(
            "Assumed role {}, credentials expire at {:?}",
            self.role_arn,
            credentials.expires_at
        );
        Ok(credentials)
    }
}

/// Validate the credential set returned by STS. Both key halves are
/// mandatory; a session token on its own is not usable.
pub fn credentials_from_sts(
    credentials: Option<aws_sdk_sts::types::Credentials>,
) -> MigrationResult<TemporaryCredentials> {
    let credentials = credentials.ok_or_else(|| {
        tracing::error!("AssumeRole returned no credentials");
        MigrationError::CredentialAcquisition
    })?;

    if credentials.access_key_id().is_empty() || credentials.secret_access_key().is_empty() {
        tracing::error!("AssumeRole returned an incomplete credential set");
        return Err(MigrationError::CredentialAcquisition);
    }

    let expiration = credentials.expiration();
    let expires_at = DateTime::<Utc>::from_timestamp(expiration.secs(), expiration.subsec_nanos());
    let session_token = Some(credentials.session_token().to_string()).filter(|t| !t.is_empty());

    Ok(TemporaryCredentials {
        access_key_id: credentials.access_key_id().to_string(),
        secret_access_key: credentials.secret_access_key().to_string(),
        session_token,
        expires_at,
    })
}
