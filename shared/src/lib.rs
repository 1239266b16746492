pub mod attributes;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod services;

pub use attributes::*;
pub use config::*;
pub use errors::*;
pub use models::*;
pub use pipeline::*;
pub use services::*;
