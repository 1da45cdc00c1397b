//! Authentication

pub(crate) mod common;
mod config;
mod generate;
mod token;

pub use config::AuthConfig;
pub use config::AuthConfigBuilder;
pub use config::ClientType;
pub use generate::get_token;
pub use generate::Authenticator;
pub use token::Token;
