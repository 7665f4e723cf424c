use crate::domain::model::{ConfigValue, ConnectionData, ResourceArea};
use crate::utils::error::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOptions {
    IncludeServices,
}

impl ConnectOptions {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            ConnectOptions::IncludeServices => "IncludeServices",
        }
    }
}

/// 已驗證的 location service session
#[async_trait]
pub trait LocationApi: Send + Sync {
    async fn get_resource_area(&self, area_id: &str) -> Result<ResourceArea>;
    async fn get_connection_data(&self, options: ConnectOptions) -> Result<ConnectionData>;
}

pub trait LocationApiFactory: Send + Sync {
    type Api: LocationApi;

    /// Opens an authenticated session rooted at `base_url`.
    fn connect(&self, base_url: &str, access_token: &str) -> Result<Self::Api>;
}

/// Line-oriented, user-visible output. Never receives secrets.
pub trait ProgressSink: Send + Sync {
    fn line(&self, text: &str);
}

/// Hands configuration values to the steps that run after this one.
pub trait VariableSink {
    fn set(&mut self, value: &ConfigValue) -> Result<()>;
}
