//! Configuration management

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::DEFAULT_IDENTITY_ATTRIBUTES;
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub services: ServicesSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub name: String,
}

/// Deployment policy for registered services.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServicesSettings {
    /// Attribute names withheld from services with anonymous access.
    pub identity_attributes: Vec<String>,
    /// Salt mixed into opaque principal identifiers.
    pub anonymous_salt: String,
}

impl Default for ServicesSettings {
    fn default() -> Self {
        Self {
            identity_attributes: default_identity_attributes(),
            anonymous_salt: String::new(),
        }
    }
}

fn default_identity_attributes() -> Vec<String> {
    DEFAULT_IDENTITY_ATTRIBUTES.iter().map(|s| s.to_string()).collect()
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        Self::build(&env, Environment::default())
    }

    fn build(env: &str, environment: Environment) -> Result<Self, AppError> {
        let config = Config::builder()
            .set_default("app.env", env)?
            .set_default("app.name", "sso-services")?
            .set_default("services.identity_attributes", default_identity_attributes())?
            .set_default("services.anonymous_salt", "")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                environment
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("services.identity_attributes")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
