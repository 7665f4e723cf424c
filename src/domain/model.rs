use crate::utils::error::{CredProviderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 套件協定；每個協定對應一個固定的 area id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolType {
    NuGet,
    Maven,
    Npm,
    PyPi,
}

impl ProtocolType {
    pub fn area_id(&self) -> &'static str {
        match self {
            ProtocolType::NuGet => "B3BE7473-68EA-4A81-BFC7-9530BAAA19AD",
            ProtocolType::Maven => "6F7F8C07-FF36-473C-BCF3-BD6CC9B6C066",
            ProtocolType::Npm => "4C83CFC1-F33A-477E-A789-29D38FFCA52E",
            ProtocolType::PyPi => "92F0314B-06C5-46E0-ABE7-15FD9D13276A",
        }
    }
}

impl FromStr for ProtocolType {
    type Err = CredProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "nuget" => Ok(ProtocolType::NuGet),
            "maven" => Ok(ProtocolType::Maven),
            "npm" => Ok(ProtocolType::Npm),
            "pypi" => Ok(ProtocolType::PyPi),
            _ => Err(CredProviderError::UnknownProtocol {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolType::NuGet => write!(f, "NuGet"),
            ProtocolType::Maven => write!(f, "Maven"),
            ProtocolType::Npm => write!(f, "npm"),
            ProtocolType::PyPi => write!(f, "PyPI"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSource {
    pub uri: String,
}

/// Authentication carried by a service connection.
///
/// `ApiKey` and `Unknown` are representable so they can be rejected loudly
/// when credentials are assembled instead of being dropped on input.
#[derive(Clone, PartialEq, Eq)]
pub enum ServiceConnectionAuth {
    UsernamePassword { username: String, password: String },
    Token { token: String },
    ApiKey { api_key: String },
    Unknown { scheme: String },
}

impl ServiceConnectionAuth {
    pub fn scheme_name(&self) -> &str {
        match self {
            ServiceConnectionAuth::UsernamePassword { .. } => "UsernamePassword",
            ServiceConnectionAuth::Token { .. } => "Token",
            ServiceConnectionAuth::ApiKey { .. } => "ApiKey",
            ServiceConnectionAuth::Unknown { scheme } => scheme,
        }
    }
}

// 手寫 Debug：不能把密碼或 token 印進日誌
impl fmt::Debug for ServiceConnectionAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceConnectionAuth::UsernamePassword { username, .. } => f
                .debug_struct("UsernamePassword")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            ServiceConnectionAuth::Token { .. } => {
                f.debug_struct("Token").field("token", &"***").finish()
            }
            ServiceConnectionAuth::ApiKey { .. } => {
                f.debug_struct("ApiKey").field("api_key", &"***").finish()
            }
            ServiceConnectionAuth::Unknown { scheme } => {
                f.debug_struct("Unknown").field("scheme", scheme).finish()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConnection {
    pub package_source: PackageSource,
    pub auth: ServiceConnectionAuth,
}

impl ServiceConnection {
    pub fn new(uri: impl Into<String>, auth: ServiceConnectionAuth) -> Self {
        Self {
            package_source: PackageSource { uri: uri.into() },
            auth,
        }
    }

    pub fn uri(&self) -> &str {
        &self.package_source.uri
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default)]
    pub custom_display_name: Option<String>,
    #[serde(default)]
    pub provider_display_name: String,
}

impl Identity {
    pub fn display_name(&self) -> &str {
        self.custom_display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.provider_display_name)
    }
}

/// `_apis/connectionData` 的回應；只保留用得到的欄位
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    pub authenticated_user: Identity,
    #[serde(default)]
    pub location_service_data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceArea {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub location_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessMapping {
    pub uri: String,
    pub is_public: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCredentials {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointCredentialsContainer {
    pub endpoint_credentials: Vec<EndpointCredentials>,
}

/// A single key/value destined for the credential provider's environment.
#[derive(Clone, PartialEq, Eq)]
pub struct ConfigValue {
    pub name: &'static str,
    pub value: String,
    pub is_secret: bool,
}

impl ConfigValue {
    pub fn plain(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
            is_secret: false,
        }
    }

    pub fn secret(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
            is_secret: true,
        }
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value: &str = if self.is_secret { "***" } else { &self.value };
        f.debug_struct("ConfigValue")
            .field("name", &self.name)
            .field("value", &value)
            .field("is_secret", &self.is_secret)
            .finish()
    }
}
