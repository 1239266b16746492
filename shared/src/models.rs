use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

pub const TRIGGER_AUTHENTICATION: &str = "UserMigration_Authentication";
pub const TRIGGER_FORGOT_PASSWORD: &str = "UserMigration_ForgotPassword";

/// Which user-facing flow invoked the migration trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Authentication,
    ForgotPassword,
}

impl TriggerKind {
    pub fn from_trigger_source(source: &str) -> Option<Self> {
        match source {
            TRIGGER_AUTHENTICATION => Some(TriggerKind::Authentication),
            TRIGGER_FORGOT_PASSWORD => Some(TriggerKind::ForgotPassword),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageAction {
    Resend,
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalUserStatus {
    Confirmed,
    ResetRequired,
}

// Custom structs for the Cognito user migration trigger; every optional field
// tolerates `null` because Cognito sends the response block with null values.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMigrationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_data: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_metadata: Option<HashMap<String, String>>,
}

impl fmt::Debug for UserMigrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserMigrationRequest")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("validation_data", &self.validation_data)
            .field("client_metadata", &self.client_metadata)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMigrationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_attributes: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_user_status: Option<FinalUserStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_action: Option<MessageAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_delivery_mediums: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_alias_creation: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMigrationEvent {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub user_pool_id: String,
    pub user_name: String,
    #[serde(default)]
    pub caller_context: HashMap<String, Value>,
    pub trigger_source: String,
    #[serde(default)]
    pub request: UserMigrationRequest,
    #[serde(default)]
    pub response: UserMigrationResponse,
}

impl UserMigrationEvent {
    pub fn trigger_kind(&self) -> Option<TriggerKind> {
        TriggerKind::from_trigger_source(&self.trigger_source)
    }
}

/// A single name/value pair as returned by the legacy user pool. Either half
/// may be missing; such pairs are skipped when building the new attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LegacyAttribute {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl LegacyAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }
}

/// A user found in the legacy pool. An empty attribute list is still a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyUserRecord {
    pub username: Option<String>,
    pub attributes: Vec<LegacyAttribute>,
}

/// Short-lived credentials for the legacy pool, owned by a single call
#[derive(Clone)]
pub struct TemporaryCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for TemporaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Result of re-submitting a password to the legacy pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    Authenticated,
    ChallengeRequired(String),
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authentication_event_json() -> Value {
        serde_json::json!({
            "version": "1",
            "triggerSource": "UserMigration_Authentication",
            "region": "eu-west-1",
            "userPoolId": "eu-west-1_new",
            "userName": "alice@example.com",
            "callerContext": {
                "awsSdkVersion": "aws-sdk-unknown-unknown",
                "clientId": "new-client"
            },
            "request": {
                "password": "hunter22",
                "validationData": null,
                "clientMetadata": { "source": "web" }
            },
            "response": {
                "userAttributes": null,
                "finalUserStatus": null,
                "messageAction": null,
                "desiredDeliveryMediums": null,
                "forceAliasCreation": null
            }
        })
    }

    #[test]
    fn test_deserialize_authentication_event() {
        let event: UserMigrationEvent =
            serde_json::from_value(authentication_event_json()).unwrap();

        assert_eq!(event.trigger_kind(), Some(TriggerKind::Authentication));
        assert_eq!(event.user_name, "alice@example.com");
        assert_eq!(event.request.password.as_deref(), Some("hunter22"));
        assert!(event.request.validation_data.is_none());
        assert!(event.response.user_attributes.is_none());
        assert!(event.response.message_action.is_none());
    }

    #[test]
    fn test_deserialize_forgot_password_event_with_prefilled_response() {
        let event: UserMigrationEvent = serde_json::from_value(serde_json::json!({
            "version": "1",
            "triggerSource": "UserMigration_ForgotPassword",
            "region": "eu-west-1",
            "userPoolId": "eu-west-1_new",
            "userName": "alice",
            "callerContext": {},
            "request": { "clientMetadata": {} },
            "response": {
                "userAttributes": { "string": "string" },
                "messageAction": "RESEND",
                "desiredDeliveryMediums": [],
                "forceAliasCreation": true
            }
        }))
        .unwrap();

        assert_eq!(event.trigger_kind(), Some(TriggerKind::ForgotPassword));
        assert!(event.request.password.is_none());
        assert_eq!(event.response.message_action, Some(MessageAction::Resend));
        assert_eq!(event.response.force_alias_creation, Some(true));
    }

    #[test]
    fn test_unknown_trigger_source() {
        assert_eq!(TriggerKind::from_trigger_source("PreSignUp_SignUp"), None);
        assert_eq!(TriggerKind::from_trigger_source("usermigration_authentication"), None);
    }

    #[test]
    fn test_serialize_response_directives() {
        let mut event: UserMigrationEvent =
            serde_json::from_value(authentication_event_json()).unwrap();
        event.response.final_user_status = Some(FinalUserStatus::Confirmed);
        event.response.message_action = Some(MessageAction::Suppress);

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["response"]["finalUserStatus"], "CONFIRMED");
        assert_eq!(json["response"]["messageAction"], "SUPPRESS");
        assert!(json["response"].get("userAttributes").is_none());
        assert_eq!(json["triggerSource"], "UserMigration_Authentication");
    }

    #[test]
    fn test_password_is_redacted_in_debug() {
        let event: UserMigrationEvent =
            serde_json::from_value(authentication_event_json()).unwrap();
        let debug = format!("{:?}", event);
        assert!(!debug.contains("hunter22"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_legacy_attribute_ignores_extra_fields() {
        let attributes: Vec<LegacyAttribute> = serde_json::from_value(serde_json::json!([
            { "name": "email", "value": "a@b.com" },
            { "invalidName": "invalid", "value": "invalid" },
            { "name": "invalid", "invalidValue": "invalid" }
        ]))
        .unwrap();

        assert_eq!(attributes[0], LegacyAttribute::new("email", "a@b.com"));
        assert!(attributes[1].name.is_none());
        assert!(attributes[2].value.is_none());
    }
}
