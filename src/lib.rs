pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::HttpLocationApiFactory;
pub use config::{Settings, SettingsOverrides};
pub use core::{
    engine::{CredProviderConfig, CredProviderEngine},
    location::{LocationContext, ServiceLocationResolver},
    provider_locator::{CredentialProviderLocator, CredentialProviderVariant},
};
pub use utils::error::{CredProviderError, Result};
