use async_trait::async_trait;
use aws_config::SdkConfig;
use std::sync::Arc;

use crate::{
    AccessMode, AuthenticationOutcome, CognitoLegacyDirectory, CredentialBroker,
    LegacyUserRecord, MigrationConfig, MigrationResult, StsCredentialBroker,
    TemporaryCredentials,
};

/// The three operations consumed from the legacy user pool
#[async_trait]
pub trait LegacyDirectory: Send + Sync {
    /// Exact username lookup. `Ok(None)` when the user does not exist.
    async fn get_user(&self, username: &str) -> MigrationResult<Option<LegacyUserRecord>>;

    /// Search on `email = <email>`, in the order the pool returns matches
    async fn find_users_by_email(&self, email: &str) -> MigrationResult<Vec<LegacyUserRecord>>;

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> MigrationResult<AuthenticationOutcome>;
}

pub type DirectoryConnector =
    Arc<dyn Fn(TemporaryCredentials) -> Arc<dyn LegacyDirectory> + Send + Sync>;

/// How a handle on the legacy directory is obtained for one call
#[derive(Clone)]
pub enum LegacyStoreAccess {
    /// Same trust boundary: one directory built from the function's own role
    Ambient(Arc<dyn LegacyDirectory>),
    /// Separate trust boundary: fresh credentials for every call
    Brokered {
        broker: Arc<dyn CredentialBroker>,
        connect: DirectoryConnector,
    },
}

impl LegacyStoreAccess {
    pub fn ambient(directory: Arc<dyn LegacyDirectory>) -> Self {
        LegacyStoreAccess::Ambient(directory)
    }

    pub fn brokered<F>(broker: Arc<dyn CredentialBroker>, connect: F) -> Self
    where
        F: Fn(TemporaryCredentials) -> Arc<dyn LegacyDirectory> + Send + Sync + 'static,
    {
        LegacyStoreAccess::Brokered {
            broker,
            connect: Arc::new(connect),
        }
    }

    /// Wire up Cognito (and STS when a role must be assumed) from deployment config
    pub fn from_config(sdk_config: &SdkConfig, config: &MigrationConfig) -> Self {
        match &config.access {
            AccessMode::Ambient => {
                tracing::info!(
                    "Legacy user pool {} reached with ambient credentials",
                    config.source_user_pool_id
                );
                Self::ambient(Arc::new(CognitoLegacyDirectory::ambient(sdk_config, config)))
            }
            AccessMode::AssumeRole {
                role_arn,
                session_name,
            } => {
                tracing::info!(
                    "Legacy user pool {} reached through role {}",
                    config.source_user_pool_id,
                    role_arn
                );
                let broker = StsCredentialBroker::new(
                    aws_sdk_sts::Client::new(sdk_config),
                    role_arn.clone(),
                    session_name.clone(),
                );
                let sdk_config = sdk_config.clone();
                let config = config.clone();
                Self::brokered(Arc::new(broker), move |credentials| {
                    Arc::new(CognitoLegacyDirectory::with_credentials(
                        &sdk_config,
                        &config,
                        credentials,
                    )) as Arc<dyn LegacyDirectory>
                })
            }
        }
    }

    pub async fn directory(&self) -> MigrationResult<Arc<dyn LegacyDirectory>> {
        match self {
            LegacyStoreAccess::Ambient(directory) => Ok(directory.clone()),
            LegacyStoreAccess::Brokered { broker, connect } => {
                let credentials = broker.assume_access().await?;
                Ok(connect(credentials))
            }
        }
    }
}
