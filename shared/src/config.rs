use crate::{AttributeAllowList, MigrationError};

pub const DEFAULT_ROLE_SESSION_NAME: &str = "user-migration";

/// How the legacy user pool is reached from this function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessMode {
    /// Same account: use the function's own execution role
    Ambient,
    /// Separate account: assume this role for every call to the legacy pool
    AssumeRole { role_arn: String, session_name: String },
}

/// Which lookup the legacy user locator performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// AdminGetUser on the exact username
    Username,
    /// ListUsers filtered on `email = "..."`
    Email,
}

impl LookupStrategy {
    pub fn parse(value: &str) -> Result<Self, MigrationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "username" => Ok(LookupStrategy::Username),
            "email" => Ok(LookupStrategy::Email),
            other => Err(MigrationError::Configuration(format!(
                "Unknown USER_LOOKUP_STRATEGY: {}",
                other
            ))),
        }
    }
}

/// Static deployment configuration, loaded once per cold start
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub source_region: String,
    pub source_user_pool_id: String,
    pub source_client_id: String,
    pub access: AccessMode,
    pub lookup: LookupStrategy,
    pub allow_list: AttributeAllowList,
}

impl MigrationConfig {
    /// Create migration config from the Lambda environment variables set by CDK
    pub fn from_env() -> Result<Self, MigrationError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Create migration config from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Result<Self, MigrationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            non_empty(key).ok_or_else(|| MigrationError::Configuration(format!("{} not set", key)))
        };

        let source_region = match non_empty("SOURCE_REGION") {
            Some(region) => region,
            None => required("AWS_REGION")
                .map_err(|_| MigrationError::Configuration("SOURCE_REGION not set".to_string()))?,
        };

        let access = match non_empty("ROLE_TO_ASSUME_ARN") {
            Some(role_arn) => AccessMode::AssumeRole {
                role_arn,
                session_name: non_empty("ROLE_SESSION_NAME")
                    .unwrap_or_else(|| DEFAULT_ROLE_SESSION_NAME.to_string()),
            },
            None => AccessMode::Ambient,
        };

        let lookup_strategy = match non_empty("USER_LOOKUP_STRATEGY") {
            Some(value) => LookupStrategy::parse(&value)?,
            None => LookupStrategy::Username,
        };

        Ok(Self {
            source_region,
            source_user_pool_id: required("SOURCE_USER_POOL_ID")?,
            source_client_id: required("SOURCE_CLIENT_ID")?,
            access,
            lookup: lookup_strategy,
            allow_list: lookup("ATTRIBUTES_TO_MIGRATE")
                .map(|raw| AttributeAllowList::parse(&raw))
                .unwrap_or_default(),
        })
    }
}
