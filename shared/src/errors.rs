use thiserror::Error;

/// Message shown to the user for both an unknown legacy user and a rejected
/// password, so the two cases cannot be told apart.
pub const INCORRECT_CREDENTIALS_MESSAGE: &str = "Incorrect email or password.";

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Could not assume role")]
    CredentialAcquisition,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Incorrect email or password.")]
    IncorrectCredentials,

    #[error("Please contact support.")]
    UnsupportedTrigger(String),

    /// Detail is kept for logs only; the message reaches the sign-in screen
    #[error("Please contact support.")]
    LegacyStore(String),

    #[error("Please contact support.")]
    Sts(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<aws_sdk_sts::Error> for MigrationError {
    fn from(err: aws_sdk_sts::Error) -> Self {
        MigrationError::Sts(aws_sdk_sts::error::DisplayErrorContext(&err).to_string())
    }
}

impl From<aws_sdk_cognitoidentityprovider::Error> for MigrationError {
    fn from(err: aws_sdk_cognitoidentityprovider::Error) -> Self {
        MigrationError::LegacyStore(
            aws_sdk_cognitoidentityprovider::error::DisplayErrorContext(&err).to_string(),
        )
    }
}

pub type MigrationResult<T> = Result<T, MigrationError>;
