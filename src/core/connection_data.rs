use crate::core::location::{LocationContext, ServiceLocationResolver};
use crate::domain::model::{ConnectionData, ProtocolType};
use crate::domain::ports::{ConnectOptions, LocationApi, LocationApiFactory};
use crate::utils::error::Result;

/// 取得 hosting 某協定之服務的 connection data
pub struct ConnectionDataFetcher<F: LocationApiFactory + Clone> {
    resolver: ServiceLocationResolver<F>,
    factory: F,
    context: LocationContext,
    access_token: String,
}

impl<F: LocationApiFactory + Clone> ConnectionDataFetcher<F> {
    pub fn new(factory: F, context: LocationContext, access_token: impl Into<String>) -> Self {
        Self {
            resolver: ServiceLocationResolver::new(factory.clone()),
            factory,
            context,
            access_token: access_token.into(),
        }
    }

    pub async fn fetch(&self, protocol: ProtocolType) -> Result<ConnectionData> {
        tracing::debug!("Finding the URI of the {} packaging service", protocol);
        let area_id = protocol.area_id();
        let service_uri = self
            .resolver
            .resolve(area_id, &self.access_token, &self.context)
            .await?;

        let api = self.factory.connect(&service_uri, &self.access_token)?;
        tracing::debug!("Acquiring connection data from {}", service_uri);
        // service definitions 之後要拿來算 access mappings
        let connection_data = api
            .get_connection_data(ConnectOptions::IncludeServices)
            .await?;
        tracing::debug!("Successfully acquired the connection data");

        Ok(connection_data)
    }
}
