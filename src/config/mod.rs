#[cfg(feature = "cli")]
pub mod cli;
pub mod service_connections;
pub mod task_context;
pub mod toml_config;

use crate::core::provider_locator::CredentialProviderVariant;
use crate::domain::model::{ProtocolType, ServiceConnection};
use crate::utils::error::Result;
use service_connections::{
    parse_endpoint_ids, service_connections_from_endpoints, SERVICE_CONNECTIONS_INPUT_VAR,
};
use std::path::PathBuf;
use task_context::TaskContext;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

/// 命令列上可覆蓋的設定
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub protocol: Option<ProtocolType>,
    pub service_connection_ids: Vec<String>,
    pub provider: Option<CredentialProviderVariant>,
    pub task_root: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub variant: CredentialProviderVariant,
    pub task_root: Option<PathBuf>,
}

/// Fully resolved inputs for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub protocol: ProtocolType,
    pub context: TaskContext,
    pub service_connections: Vec<ServiceConnection>,
    pub credential_provider: Option<ProviderSettings>,
}

impl Settings {
    /// Precedence is command line, then config file, then agent environment.
    pub fn resolve<L>(
        overrides: &SettingsOverrides,
        file: Option<&TomlConfig>,
        lookup: &L,
    ) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let file_protocol = match file {
            Some(config) => config.protocol()?,
            None => None,
        };
        let protocol = overrides
            .protocol
            .or(file_protocol)
            .unwrap_or(ProtocolType::NuGet);

        let context = TaskContext::from_sources(file.map(|config| &config.task), lookup)?;

        let service_connections = if !overrides.service_connection_ids.is_empty() {
            service_connections_from_endpoints(&overrides.service_connection_ids, lookup)?
        } else if let Some(config) = file.filter(|config| !config.service_connections.is_empty()) {
            config.service_connections()?
        } else {
            let ids = lookup(SERVICE_CONNECTIONS_INPUT_VAR)
                .map(|raw| parse_endpoint_ids(&raw))
                .unwrap_or_default();
            service_connections_from_endpoints(&ids, lookup)?
        };

        let file_provider = file.and_then(|config| config.credential_provider.as_ref());
        let credential_provider = overrides
            .provider
            .or(file_provider.map(|provider| provider.variant))
            .map(|variant| ProviderSettings {
                variant,
                task_root: overrides
                    .task_root
                    .clone()
                    .or_else(|| file_provider.and_then(|provider| provider.task_root.clone())),
            });

        tracing::debug!(
            "Resolved settings: protocol={}, service connections={}, provider={:?}",
            protocol,
            service_connections.len(),
            credential_provider.as_ref().map(|p| p.variant)
        );

        Ok(Self {
            protocol,
            context,
            service_connections,
            credential_provider,
        })
    }
}
