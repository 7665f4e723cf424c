use crate::config::toml_config::TaskSection;
use crate::core::location::LocationContext;
use crate::utils::error::{CredProviderError, Result};
use crate::utils::validation::{validate_non_empty_secret, validate_url, Validate};
use std::fmt;

pub const COLLECTION_URI_VAR: &str = "SYSTEM_TEAMFOUNDATIONCOLLECTIONURI";
pub const SERVER_TYPE_VAR: &str = "SYSTEM_SERVERTYPE";
pub const SYSTEM_CONNECTION_TOKEN_VAR: &str =
    "ENDPOINT_AUTH_PARAMETER_SYSTEMVSSCONNECTION_ACCESSTOKEN";
pub const ACCESS_TOKEN_VAR: &str = "SYSTEM_ACCESSTOKEN";

/// 目前這個 job 的執行環境：collection 位址、server 類型與 job access token
#[derive(Clone)]
pub struct TaskContext {
    pub location: LocationContext,
    access_token: String,
}

impl TaskContext {
    pub fn new(location: LocationContext, access_token: impl Into<String>) -> Self {
        Self {
            location,
            access_token: access_token.into(),
        }
    }

    /// Values from the config file win over the agent environment.
    pub fn from_sources<L>(file: Option<&TaskSection>, lookup: &L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let env = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let collection_uri = file
            .and_then(|task| task.collection_uri.clone())
            .or_else(|| env(COLLECTION_URI_VAR))
            .ok_or_else(|| CredProviderError::MissingConfigError {
                field: COLLECTION_URI_VAR.to_string(),
            })?;

        let server_type = file
            .and_then(|task| task.server_type.clone())
            .or_else(|| env(SERVER_TYPE_VAR));

        if file.is_some_and(|task| task.access_token.is_some() && task.access_token().is_none()) {
            tracing::warn!("⚠️ task.access_token has an unresolved placeholder, using the agent token");
        }
        let access_token = file
            .and_then(TaskSection::access_token)
            .map(str::to_string)
            .or_else(|| env(SYSTEM_CONNECTION_TOKEN_VAR))
            .or_else(|| env(ACCESS_TOKEN_VAR))
            .ok_or_else(|| CredProviderError::MissingConfigError {
                field: ACCESS_TOKEN_VAR.to_string(),
            })?;

        let context = Self::new(LocationContext::new(collection_uri, server_type), access_token);
        context.validate()?;
        Ok(context)
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl Validate for TaskContext {
    fn validate(&self) -> Result<()> {
        validate_url("collection_uri", &self.location.collection_uri)?;
        validate_non_empty_secret("access_token", &self.access_token)?;
        Ok(())
    }
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("location", &self.location)
            .field("access_token", &"***")
            .finish()
    }
}
