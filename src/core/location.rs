use crate::domain::ports::{LocationApi, LocationApiFactory};
use crate::utils::error::{CredProviderError, Result};

/// Ambient deployment context: where the collection lives and what kind of server hosts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationContext {
    pub collection_uri: String,
    pub server_type: Option<String>,
}

impl LocationContext {
    pub fn new(collection_uri: impl Into<String>, server_type: Option<String>) -> Self {
        Self {
            collection_uri: collection_uri.into(),
            server_type,
        }
    }

    /// 只有 "hosted"（不分大小寫）才是多服務的雲端部署
    pub fn is_hosted(&self) -> bool {
        self.server_type
            .as_deref()
            .is_some_and(|server_type| server_type.eq_ignore_ascii_case("hosted"))
    }
}

pub struct ServiceLocationResolver<F: LocationApiFactory> {
    factory: F,
}

impl<F: LocationApiFactory> ServiceLocationResolver<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Returns the base address of the service hosting `area_id`.
    ///
    /// On-premises servers host every area at the collection address, so no
    /// lookup happens there. Hosted deployments shard areas across services
    /// and have to be asked through the collection's resource area directory.
    pub async fn resolve(
        &self,
        area_id: &str,
        access_token: &str,
        context: &LocationContext,
    ) -> Result<String> {
        if !context.is_hosted() {
            tracing::debug!(
                "On-premises server, using collection URI {} for area {}",
                context.collection_uri,
                area_id
            );
            return Ok(context.collection_uri.clone());
        }

        tracing::debug!(
            "Getting URI for area ID {} from {}",
            area_id,
            context.collection_uri
        );

        let lookup = match self.factory.connect(&context.collection_uri, access_token) {
            Ok(api) => api.get_resource_area(area_id).await,
            Err(e) => Err(e),
        };

        match lookup {
            Ok(area) => {
                tracing::debug!("Area {} is served from {}", area_id, area.location_url);
                Ok(area.location_url)
            }
            Err(e) => Err(CredProviderError::ResolutionError {
                area_id: area_id.to_string(),
                source: Box::new(e),
            }),
        }
    }
}
