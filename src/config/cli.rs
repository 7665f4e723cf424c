use crate::config::SettingsOverrides;
use crate::core::provider_locator::CredentialProviderVariant;
use crate::domain::model::ProtocolType;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "feed-auth")]
#[command(about = "Configure the artifacts credential provider for package restore")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Package protocol whose feeds should be authenticated (nuget, maven, npm, pypi)
    #[arg(long)]
    pub protocol: Option<ProtocolType>,

    /// Comma separated service connection (endpoint) ids
    #[arg(long, value_delimiter = ',')]
    pub service_connections: Vec<String>,

    /// Credential provider variant to expose through NUGET_PLUGIN_PATHS (netcore, netfx)
    #[arg(long)]
    pub provider: Option<CredentialProviderVariant>,

    /// Directory the credential provider plugins are installed under
    #[arg(long)]
    pub task_root: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            protocol: self.protocol,
            service_connection_ids: self
                .service_connections
                .iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
            provider: self.provider,
            task_root: self.task_root.clone(),
        }
    }
}
