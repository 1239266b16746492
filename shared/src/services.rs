pub mod cognito_directory;
pub mod credential_broker;
pub mod legacy_store;
pub mod password_verifier;
pub mod user_locator;

pub use cognito_directory::*;
pub use credential_broker::*;
pub use legacy_store::*;
pub use password_verifier::*;
pub use user_locator::*;
