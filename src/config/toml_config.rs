use crate::core::provider_locator::CredentialProviderVariant;
use crate::domain::model::{ProtocolType, ServiceConnection, ServiceConnectionAuth};
use crate::utils::error::{CredProviderError, Result};
use crate::utils::validation::{validate_path, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PLACEHOLDER_PATTERN: &str = r"\$\{([^}]+)\}";

/// 可選的設定檔；沒有給的欄位會回落到 agent 環境變數
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub task: TaskSection,
    pub credential_provider: Option<CredentialProviderSection>,
    #[serde(default)]
    pub service_connections: Vec<ServiceConnectionEntry>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TaskSection {
    pub protocol: Option<String>,
    pub collection_uri: Option<String>,
    pub server_type: Option<String>,
    pub access_token: Option<String>,
}

impl TaskSection {
    /// A token still holding a `${VAR}` placeholder came from an unset
    /// variable and is treated as not configured.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .filter(|token| !has_unresolved_placeholder(token))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialProviderSection {
    pub variant: CredentialProviderVariant,
    pub task_root: Option<PathBuf>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceConnectionEntry {
    pub uri: String,
    pub auth_type: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub api_key: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CredProviderError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SYSTEM_ACCESSTOKEN})；未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(PLACEHOLDER_PATTERN).map_err(|e| CredProviderError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn protocol(&self) -> Result<Option<ProtocolType>> {
        self.task
            .protocol
            .as_deref()
            .map(str::parse)
            .transpose()
    }

    pub fn service_connections(&self) -> Result<Vec<ServiceConnection>> {
        self.service_connections
            .iter()
            .map(ServiceConnectionEntry::to_service_connection)
            .collect()
    }
}

fn has_unresolved_placeholder(value: &str) -> bool {
    Regex::new(PLACEHOLDER_PATTERN)
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

impl ServiceConnectionEntry {
    /// Unrecognized auth types are kept as `Unknown` so that assembling
    /// credentials reports them, rather than failing while loading.
    pub fn to_service_connection(&self) -> Result<ServiceConnection> {
        let require = |value: &Option<String>, name: &str| {
            value.clone().ok_or_else(|| CredProviderError::MissingConfigError {
                field: format!("service_connections[{}].{}", self.uri, name),
            })
        };

        let auth = match self.auth_type.to_lowercase().as_str() {
            "usernamepassword" | "basic" => ServiceConnectionAuth::UsernamePassword {
                username: require(&self.username, "username")?,
                password: require(&self.password, "password")?,
            },
            "token" => ServiceConnectionAuth::Token {
                token: require(&self.token, "token")?,
            },
            "apikey" => ServiceConnectionAuth::ApiKey {
                api_key: require(&self.api_key, "api_key")?,
            },
            _ => ServiceConnectionAuth::Unknown {
                scheme: self.auth_type.clone(),
            },
        };

        Ok(ServiceConnection::new(self.uri.clone(), auth))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.protocol()?;

        if let Some(collection_uri) = &self.task.collection_uri {
            validate_url("task.collection_uri", collection_uri)?;
        }

        if let Some(task_root) = self
            .credential_provider
            .as_ref()
            .and_then(|provider| provider.task_root.as_ref())
        {
            validate_path("credential_provider.task_root", task_root)?;
        }

        Ok(())
    }
}
