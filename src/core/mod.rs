pub mod access_mapping;
pub mod connection_data;
pub mod credential_config;
pub mod engine;
pub mod location;
pub mod provider_locator;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{
    AccessMapping, ConfigValue, ConnectionData, EndpointCredentials,
    EndpointCredentialsContainer, ProtocolType, ServiceConnection, ServiceConnectionAuth,
};
pub use crate::domain::ports::{
    ConnectOptions, LocationApi, LocationApiFactory, ProgressSink, VariableSink,
};
pub use crate::utils::error::Result;
