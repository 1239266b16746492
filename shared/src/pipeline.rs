use aws_config::SdkConfig;
use std::sync::Arc;

use crate::{
    filter_attributes, locator_for, AttributeAllowList, FinalUserStatus, LegacyStoreAccess,
    LegacyUserRecord, MessageAction, MigrationConfig, MigrationError, MigrationResult,
    PasswordVerifier, TriggerKind, UserLocator, UserMigrationEvent,
};

/// Decides, once per trigger invocation, whether a legacy user may be
/// migrated and fills in the response the new user pool acts on.
pub struct MigrationPipeline {
    locator: Arc<dyn UserLocator>,
    verifier: PasswordVerifier,
    allow_list: AttributeAllowList,
}

impl MigrationPipeline {
    pub fn new(
        locator: Arc<dyn UserLocator>,
        verifier: PasswordVerifier,
        allow_list: AttributeAllowList,
    ) -> Self {
        Self {
            locator,
            verifier,
            allow_list,
        }
    }

    pub fn from_config(sdk_config: &SdkConfig, config: &MigrationConfig) -> Self {
        let access = LegacyStoreAccess::from_config(sdk_config, config);
        Self::new(
            locator_for(config.lookup, access.clone()),
            PasswordVerifier::new(access),
            config.allow_list.clone(),
        )
    }

    pub async fn migrate(&self, mut event: UserMigrationEvent) -> MigrationResult<UserMigrationEvent> {
        match event.trigger_kind() {
            Some(TriggerKind::Authentication) => {
                let user = self.authenticate(&event).await?;
                event.response.user_attributes =
                    Some(filter_attributes(&user.attributes, &self.allow_list));
                event.response.final_user_status = Some(FinalUserStatus::Confirmed);
                event.response.message_action = Some(MessageAction::Suppress);
            }
            Some(TriggerKind::ForgotPassword) => {
                let user = self.find_user(&event.user_name).await?.ok_or_else(|| {
                    tracing::warn!("No legacy user to reset password for: {}", event.user_name);
                    MigrationError::IncorrectCredentials
                })?;
                event.response.user_attributes =
                    Some(filter_attributes(&user.attributes, &self.allow_list));
                event.response.message_action = Some(MessageAction::Suppress);
            }
            None => {
                tracing::error!("Unknown trigger source: {}", event.trigger_source);
                return Err(MigrationError::UnsupportedTrigger(event.trigger_source));
            }
        }

        tracing::info!(
            "Migrating user {} with {} attributes",
            event.user_name,
            event
                .response
                .user_attributes
                .as_ref()
                .map(|attributes| attributes.len())
                .unwrap_or(0)
        );
        Ok(event)
    }

    /// Both the password check and the lookup run, one after the other,
    /// before either result is acted on.
    async fn authenticate(&self, event: &UserMigrationEvent) -> MigrationResult<LegacyUserRecord> {
        let authenticated = match event.request.password.as_deref() {
            Some(password) => self.verifier.verify(&event.user_name, password).await?,
            None => {
                tracing::warn!("Authentication trigger without a password for {}", event.user_name);
                false
            }
        };
        let user = self.find_user(&event.user_name).await?;

        match (authenticated, user) {
            (true, Some(user)) => Ok(user),
            (false, _) => {
                tracing::warn!("Legacy password check failed for {}", event.user_name);
                Err(MigrationError::IncorrectCredentials)
            }
            (true, None) => {
                tracing::warn!("Authenticated user {} has no legacy record", event.user_name);
                Err(MigrationError::IncorrectCredentials)
            }
        }
    }

    async fn find_user(&self, username_or_email: &str) -> MigrationResult<Option<LegacyUserRecord>> {
        match self.locator.locate(username_or_email).await {
            Ok(user) => Ok(Some(user)),
            Err(MigrationError::UserNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
