use crate::domain::model::{ConnectionData, ResourceArea};
use crate::domain::ports::{ConnectOptions, LocationApi, LocationApiFactory};
use crate::utils::error::{CredProviderError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

const RESOURCE_AREAS_API_VERSION: &str = "5.0-preview.1";
const USER_AGENT: &str = concat!("feed-auth/", env!("CARGO_PKG_VERSION"));

/// Opens location service sessions over HTTP. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpLocationApiFactory {
    client: Client,
}

impl HttpLocationApiFactory {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

impl LocationApiFactory for HttpLocationApiFactory {
    type Api = HttpLocationApi;

    fn connect(&self, base_url: &str, access_token: &str) -> Result<HttpLocationApi> {
        validate_url("service_uri", base_url)?;
        Ok(HttpLocationApi {
            client: self.client.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }
}

pub struct HttpLocationApi {
    client: Client,
    base_url: String,
    access_token: String,
}

impl HttpLocationApi {
    fn api_url(&self, path: &str) -> String {
        format!("{}/_apis/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        tracing::debug!("📡 GET {}", url);
        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        tracing::debug!("📡 Response status: {}", response.status());
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    // body 讀不到時只保留狀態碼
    let body = response.text().await.unwrap_or_default();
    Err(CredProviderError::HttpStatusError {
        status: status.as_u16(),
        url,
        body,
    })
}

#[async_trait]
impl LocationApi for HttpLocationApi {
    async fn get_resource_area(&self, area_id: &str) -> Result<ResourceArea> {
        let url = self.api_url(&format!("resourceAreas/{}", area_id));
        self.get_json(&url, &[("api-version", RESOURCE_AREAS_API_VERSION)])
            .await
    }

    async fn get_connection_data(&self, options: ConnectOptions) -> Result<ConnectionData> {
        let url = self.api_url("connectionData");
        self.get_json(
            &url,
            &[
                ("connectOptions", options.as_query_value()),
                ("lastChangeId", "-1"),
                ("lastChangeId64", "-1"),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_resource_area_sends_bearer_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/org/_apis/resourceAreas/area-1")
                .query_param("api-version", RESOURCE_AREAS_API_VERSION)
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!({
                "id": "area-1",
                "name": "nuget",
                "locationUrl": "https://pkgs.example/org/"
            }));
        });

        let factory = HttpLocationApiFactory::new().unwrap();
        let api = factory.connect(&server.url("/org/"), "tok").unwrap();
        let area = api.get_resource_area("area-1").await.unwrap();

        mock.assert();
        assert_eq!(area.location_url, "https://pkgs.example/org/");
    }

    #[tokio::test]
    async fn test_error_status_keeps_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/_apis/connectionData");
            then.status(401).body("TF400813: not authorized");
        });

        let factory = HttpLocationApiFactory::new().unwrap();
        let api = factory.connect(&server.base_url(), "tok").unwrap();
        let err = api
            .get_connection_data(ConnectOptions::IncludeServices)
            .await
            .unwrap_err();

        mock.assert();
        match err {
            CredProviderError::HttpStatusError { status, body, .. } => {
                assert_eq!(status, 401);
                assert!(body.contains("TF400813"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_connect_rejects_relative_address() {
        let factory = HttpLocationApiFactory::new().unwrap();
        assert!(factory.connect("not a url", "tok").is_err());
    }
}
