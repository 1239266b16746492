use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cognitoidentityprovider::config::{Builder as CognitoConfigBuilder, Credentials, Region};
use aws_sdk_cognitoidentityprovider::error::DisplayErrorContext;
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType, UserType};
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;

use crate::{
    AuthenticationOutcome, LegacyAttribute, LegacyDirectory, LegacyUserRecord, MigrationConfig,
    MigrationResult, TemporaryCredentials,
};

const CREDENTIALS_PROVIDER_NAME: &str = "user-migration-assumed-role";

/// Legacy directory backed by a Cognito user pool
pub struct CognitoLegacyDirectory {
    client: CognitoClient,
    user_pool_id: String,
    client_id: String,
}

impl CognitoLegacyDirectory {
    pub fn new(client: CognitoClient, user_pool_id: String, client_id: String) -> Self {
        Self {
            client,
            user_pool_id,
            client_id,
        }
    }

    /// Client using the function's own credentials, pointed at the legacy region
    pub fn ambient(sdk_config: &SdkConfig, config: &MigrationConfig) -> Self {
        let client_config = CognitoConfigBuilder::from(sdk_config)
            .region(Region::new(config.source_region.clone()))
            .build();
        Self::from_parts(CognitoClient::from_conf(client_config), config)
    }

    /// Client bound to one set of assumed-role credentials
    pub fn with_credentials(
        sdk_config: &SdkConfig,
        config: &MigrationConfig,
        credentials: TemporaryCredentials,
    ) -> Self {
        let provider = Credentials::new(
            credentials.access_key_id,
            credentials.secret_access_key,
            credentials.session_token,
            credentials.expires_at.map(Into::into),
            CREDENTIALS_PROVIDER_NAME,
        );
        let client_config = CognitoConfigBuilder::from(sdk_config)
            .region(Region::new(config.source_region.clone()))
            .credentials_provider(provider)
            .build();
        Self::from_parts(CognitoClient::from_conf(client_config), config)
    }

    fn from_parts(client: CognitoClient, config: &MigrationConfig) -> Self {
        Self::new(
            client,
            config.source_user_pool_id.clone(),
            config.source_client_id.clone(),
        )
    }
}

#[async_trait]
impl LegacyDirectory for CognitoLegacyDirectory {
    async fn get_user(&self, username: &str) -> MigrationResult<Option<LegacyUserRecord>> {
        let result = self
            .client
            .admin_get_user()
            .user_pool_id(&self.user_pool_id)
            .username(username)
            .send()
            .await;

        match result {
            Ok(output) => Ok(Some(LegacyUserRecord {
                username: Some(output.username),
                attributes: convert_attributes(output.user_attributes),
            })),
            Err(e)
                if e
                    .as_service_error()
                    .map(|service_error| service_error.is_user_not_found_exception())
                    .unwrap_or(false) =>
            {
                tracing::info!("AdminGetUser found no legacy user");
                Ok(None)
            }
            Err(e) => {
                tracing::error!("AdminGetUser failed: {}", DisplayErrorContext(&e));
                Err(aws_sdk_cognitoidentityprovider::Error::from(e).into())
            }
        }
    }

    async fn find_users_by_email(&self, email: &str) -> MigrationResult<Vec<LegacyUserRecord>> {
        let output = self
            .client
            .list_users()
            .user_pool_id(&self.user_pool_id)
            .filter(email_filter(email))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("ListUsers failed: {}", DisplayErrorContext(&e));
                aws_sdk_cognitoidentityprovider::Error::from(e)
            })?;

        Ok(output
            .users
            .unwrap_or_default()
            .into_iter()
            .map(convert_user)
            .collect())
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> MigrationResult<AuthenticationOutcome> {
        let result = self
            .client
            .admin_initiate_auth()
            .user_pool_id(&self.user_pool_id)
            .client_id(&self.client_id)
            .auth_flow(AuthFlowType::AdminUserPasswordAuth)
            .auth_parameters("USERNAME", username)
            .auth_parameters("PASSWORD", password)
            .send()
            .await;

        match result {
            Ok(output) if output.authentication_result.is_some() => {
                Ok(AuthenticationOutcome::Authenticated)
            }
            Ok(output) => Ok(AuthenticationOutcome::ChallengeRequired(
                output
                    .challenge_name
                    .map(|challenge| challenge.as_str().to_string())
                    .unwrap_or_else(|| "NONE".to_string()),
            )),
            Err(e) => Ok(AuthenticationOutcome::Rejected(
                DisplayErrorContext(&e).to_string(),
            )),
        }
    }
}

/// Cognito ListUsers filter for an exact email match
pub fn email_filter(email: &str) -> String {
    let escaped = email.replace('\\', "\\\\").replace('"', "\\\"");
    format!("email = \"{}\"", escaped)
}

fn convert_attributes(attributes: Option<Vec<AttributeType>>) -> Vec<LegacyAttribute> {
    attributes
        .unwrap_or_default()
        .into_iter()
        .map(|attribute| LegacyAttribute {
            name: Some(attribute.name),
            value: attribute.value,
        })
        .collect()
}

fn convert_user(user: UserType) -> LegacyUserRecord {
    LegacyUserRecord {
        username: user.username,
        attributes: convert_attributes(user.attributes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_filter() {
        assert_eq!(email_filter("a@b.com"), r#"email = "a@b.com""#);
    }

    #[test]
    fn test_email_filter_escapes_quotes() {
        assert_eq!(email_filter(r#"a"@b.com"#), r#"email = "a\"@b.com""#);
        assert_eq!(email_filter(r"a\@b.com"), r#"email = "a\\@b.com""#);
    }

    #[test]
    fn test_convert_user_keeps_pool_order() {
        let user = UserType::builder()
            .username("legacy-alice")
            .attributes(
                AttributeType::builder()
                    .name("email")
                    .value("alice@example.com")
                    .build()
                    .unwrap(),
            )
            .attributes(AttributeType::builder().name("nickname").build().unwrap())
            .build();

        let record = convert_user(user);

        assert_eq!(record.username.as_deref(), Some("legacy-alice"));
        assert_eq!(
            record.attributes,
            vec![
                LegacyAttribute::new("email", "alice@example.com"),
                LegacyAttribute {
                    name: Some("nickname".to_string()),
                    value: None
                },
            ]
        );
    }
}
