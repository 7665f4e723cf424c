use crate::core::access_mapping::PackagingAccessMappings;
use crate::domain::model::{
    ConfigValue, ConnectionData, EndpointCredentials, EndpointCredentialsContainer,
    ServiceConnection, ServiceConnectionAuth,
};
use crate::domain::ports::ProgressSink;
use crate::utils::error::{CredProviderError, Result};

pub const URI_PREFIXES_KEY: &str = "VSS_NUGET_URI_PREFIXES";
pub const ACCESS_TOKEN_KEY: &str = "VSS_NUGET_ACCESSTOKEN";
pub const EXTERNAL_ENDPOINTS_KEY: &str = "VSS_NUGET_EXTERNAL_FEED_ENDPOINTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SameOrganizationConfig {
    pub uri_prefixes: ConfigValue,
    pub access_token: ConfigValue,
}

pub struct CredentialConfigBuilder<P: ProgressSink> {
    progress: P,
}

impl<P: ProgressSink> CredentialConfigBuilder<P> {
    pub fn new(progress: P) -> Self {
        Self { progress }
    }

    /// Configuration for feeds inside the caller's own organization.
    ///
    /// Only public prefixes are shown to the user; host-guid style mappings
    /// still go into the prefix list but would just confuse people.
    pub fn same_organization(
        &self,
        connection_data: &ConnectionData,
        access_token: &str,
    ) -> Result<SameOrganizationConfig> {
        let mappings = PackagingAccessMappings::from_location_service_data(
            &connection_data.location_service_data,
        )?;
        let all_prefixes = mappings.all_prefixes();
        let public_prefixes = mappings.public_prefixes();

        self.progress.line(&format!(
            "Setting up the credential provider to use the identity '{}' for feeds in your organization/collection starting with:",
            connection_data.authenticated_user.display_name()
        ));
        for prefix in &public_prefixes {
            self.progress.line(&format!("  {}", prefix));
        }
        self.progress.line("");

        tracing::debug!(
            "Configured {} URI prefixes ({} public)",
            all_prefixes.len(),
            public_prefixes.len()
        );

        Ok(SameOrganizationConfig {
            uri_prefixes: ConfigValue::plain(URI_PREFIXES_KEY, all_prefixes.join(";")),
            access_token: ConfigValue::secret(ACCESS_TOKEN_KEY, access_token),
        })
    }

    /// Configuration for feeds reached through service connections.
    /// Returns `None` when there are no connections to configure.
    pub fn external_endpoints(
        &self,
        service_connections: Option<&[ServiceConnection]>,
    ) -> Result<Option<ConfigValue>> {
        let connections = match service_connections {
            Some(connections) if !connections.is_empty() => connections,
            _ => return Ok(None),
        };

        // URI 先全部印出，之後才驗證；失敗時已印出的行不會收回
        self.progress
            .line("Setting up the credential provider for these service connections:");
        for connection in connections {
            self.progress.line(&format!("  {}", connection.uri()));
        }
        self.progress.line("");

        let json = build_external_feed_endpoints_json(Some(connections))?;
        Ok(json.map(|json| ConfigValue::secret(EXTERNAL_ENDPOINTS_KEY, json)))
    }
}

/// Converts service connections into credential entries, failing on the
/// first connection whose authentication cannot be expressed.
pub fn build_endpoint_credentials(
    service_connections: &[ServiceConnection],
) -> Result<EndpointCredentialsContainer> {
    let mut container = EndpointCredentialsContainer::default();

    for connection in service_connections {
        let endpoint = connection.uri().to_string();
        match &connection.auth {
            ServiceConnectionAuth::UsernamePassword { username, password } => {
                tracing::debug!("Detected username/password credentials for '{}'", endpoint);
                container.endpoint_credentials.push(EndpointCredentials {
                    endpoint,
                    username: Some(username.clone()),
                    password: password.clone(),
                });
            }
            ServiceConnectionAuth::Token { token } => {
                tracing::debug!("Detected token credentials for '{}'", endpoint);
                container.endpoint_credentials.push(EndpointCredentials {
                    endpoint,
                    username: None,
                    password: token.clone(),
                });
            }
            ServiceConnectionAuth::ApiKey { .. } => {
                return Err(CredProviderError::UnsupportedAuthType { endpoint });
            }
            ServiceConnectionAuth::Unknown { scheme } => {
                return Err(CredProviderError::InvalidServiceConnection {
                    endpoint,
                    scheme: scheme.clone(),
                });
            }
        }
    }

    Ok(container)
}

pub fn build_external_feed_endpoints_json(
    service_connections: Option<&[ServiceConnection]>,
) -> Result<Option<String>> {
    match service_connections {
        Some(connections) if !connections.is_empty() => {
            let container = build_endpoint_credentials(connections)?;
            Ok(Some(serde_json::to_string(&container)?))
        }
        _ => Ok(None),
    }
}
