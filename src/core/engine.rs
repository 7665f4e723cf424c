use crate::core::connection_data::ConnectionDataFetcher;
use crate::core::credential_config::{CredentialConfigBuilder, SameOrganizationConfig};
use crate::core::location::LocationContext;
use crate::domain::model::{ConfigValue, ProtocolType, ServiceConnection};
use crate::domain::ports::{LocationApiFactory, ProgressSink, VariableSink};
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredProviderConfig {
    pub same_organization: SameOrganizationConfig,
    pub external_endpoints: Option<ConfigValue>,
}

/// Configures the credential provider for same-organization feeds and
/// service connection feeds.
pub struct CredProviderEngine<F: LocationApiFactory + Clone, P: ProgressSink> {
    fetcher: ConnectionDataFetcher<F>,
    builder: CredentialConfigBuilder<P>,
    access_token: String,
}

impl<F: LocationApiFactory + Clone, P: ProgressSink> CredProviderEngine<F, P> {
    pub fn new(
        factory: F,
        context: LocationContext,
        access_token: impl Into<String>,
        progress: P,
    ) -> Self {
        let access_token = access_token.into();
        Self {
            fetcher: ConnectionDataFetcher::new(factory, context, access_token.clone()),
            builder: CredentialConfigBuilder::new(progress),
            access_token,
        }
    }

    /// Runs both configuration steps and hands each value to `sink` as soon
    /// as its step succeeds.
    ///
    /// The steps are independent: a rejected service connection fails the
    /// run, but the same-organization values have already been set by then.
    pub async fn configure<S: VariableSink>(
        &self,
        protocol: ProtocolType,
        service_connections: Option<&[ServiceConnection]>,
        sink: &mut S,
    ) -> Result<CredProviderConfig> {
        tracing::info!("🔐 Configuring the credential provider for {} feeds", protocol);

        let same_organization = self.configure_same_organization(protocol).await?;
        sink.set(&same_organization.uri_prefixes)?;
        sink.set(&same_organization.access_token)?;

        let external_endpoints = self.configure_service_connections(service_connections)?;
        if let Some(endpoints) = &external_endpoints {
            sink.set(endpoints)?;
        }

        tracing::info!(
            "✅ Credential provider configured ({} service connection feeds)",
            service_connections.map_or(0, <[ServiceConnection]>::len)
        );

        Ok(CredProviderConfig {
            same_organization,
            external_endpoints,
        })
    }

    pub async fn configure_same_organization(
        &self,
        protocol: ProtocolType,
    ) -> Result<SameOrganizationConfig> {
        let connection_data = self.fetcher.fetch(protocol).await?;
        self.builder
            .same_organization(&connection_data, &self.access_token)
    }

    pub fn configure_service_connections(
        &self,
        service_connections: Option<&[ServiceConnection]>,
    ) -> Result<Option<ConfigValue>> {
        self.builder.external_endpoints(service_connections)
    }
}
