use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredProviderError {
    #[error("Failed to resolve the service location for area {area_id}: {source}")]
    ResolutionError {
        area_id: String,
        #[source]
        source: Box<CredProviderError>,
    },

    #[error("Unknown package protocol: {name}")]
    UnknownProtocol { name: String },

    #[error("The service connection for '{endpoint}' uses an API key, which is not supported for authentication. Use a username/password or token based service connection instead.")]
    UnsupportedAuthType { endpoint: String },

    #[error("The service connection for '{endpoint}' has an invalid or unrecognized authentication scheme '{scheme}'")]
    InvalidServiceConnection { endpoint: String, scheme: String },

    #[error("The {variant} credential provider can only be used on Windows")]
    UnsupportedPlatform { variant: String },

    #[error("Request to {url} failed with status {status}: {body}")]
    HttpStatusError { status: u16, url: String, body: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    ServiceConnection,
    Configuration,
    Platform,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CredProviderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ResolutionError { .. }
            | Self::HttpStatusError { .. }
            | Self::ApiError(_) => ErrorCategory::Network,
            Self::UnsupportedAuthType { .. } | Self::InvalidServiceConnection { .. } => {
                ErrorCategory::ServiceConnection
            }
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::UnsupportedPlatform { .. } => ErrorCategory::Platform,
            Self::UnknownProtocol { .. } | Self::SerializationError(_) | Self::IoError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤可由使用者重新執行
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::ServiceConnection
            | ErrorCategory::Configuration
            | ErrorCategory::Platform => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ResolutionError { .. } => {
                "Check that the collection URI is reachable and the access token is valid"
            }
            Self::HttpStatusError { status: 401, .. } | Self::HttpStatusError { status: 403, .. } => {
                "Check that the job access token is allowed to read package feeds"
            }
            Self::HttpStatusError { .. } | Self::ApiError(_) => {
                "Check network connectivity to the package service and re-run the job"
            }
            Self::UnsupportedAuthType { .. } => {
                "Replace the API key service connection with a username/password or token service connection"
            }
            Self::InvalidServiceConnection { .. } => {
                "Use a NuGet service connection with basic or token authentication"
            }
            Self::UnsupportedPlatform { .. } => {
                "Use the netcore credential provider on non-Windows agents"
            }
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigError { .. } => "Check the task inputs and the configuration file",
            Self::UnknownProtocol { .. } => "Use one of: nuget, maven, npm, pypi",
            Self::SerializationError(_) | Self::IoError(_) => {
                "This is likely a bug, please report it with the verbose log"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ResolutionError { area_id, .. } => format!(
                "Could not locate the packaging service (area {}): {}",
                area_id,
                self.root_cause()
            ),
            _ => self.to_string(),
        }
    }

    /// 沿著 ResolutionError 的鏈找到最底層的錯誤
    pub fn root_cause(&self) -> &CredProviderError {
        match self {
            Self::ResolutionError { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, CredProviderError>;
