use crate::domain::model::{ServiceConnection, ServiceConnectionAuth};
use crate::utils::error::{CredProviderError, Result};

pub const SERVICE_CONNECTIONS_INPUT_VAR: &str = "INPUT_NUGETSERVICECONNECTIONS";

/// Splits a comma separated list of endpoint ids, ignoring blanks.
pub fn parse_endpoint_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// 從 agent 的 ENDPOINT_* 環境變數組出 service connection
pub fn service_connection_from_endpoint<L>(id: &str, lookup: &L) -> Result<ServiceConnection>
where
    L: Fn(&str) -> Option<String>,
{
    let key = id.to_uppercase();
    let required = |name: String| {
        lookup(&name)
            .filter(|value| !value.is_empty())
            .ok_or(CredProviderError::MissingConfigError { field: name })
    };
    let parameter = |param: &str| format!("ENDPOINT_AUTH_PARAMETER_{}_{}", key, param);

    let uri = required(format!("ENDPOINT_URL_{}", key))?;
    let scheme = lookup(&format!("ENDPOINT_AUTH_SCHEME_{}", key)).unwrap_or_default();

    let auth = match scheme.to_lowercase().as_str() {
        "usernamepassword" => ServiceConnectionAuth::UsernamePassword {
            username: required(parameter("USERNAME"))?,
            password: required(parameter("PASSWORD"))?,
        },
        "token" => ServiceConnectionAuth::Token {
            token: required(parameter("APITOKEN"))?,
        },
        // NuGet 的 API key 連線在 agent 上是 scheme "None" 加上 NUGETKEY
        "none" => match lookup(&parameter("NUGETKEY")).filter(|key| !key.is_empty()) {
            Some(api_key) => ServiceConnectionAuth::ApiKey { api_key },
            None => ServiceConnectionAuth::Unknown { scheme },
        },
        _ => ServiceConnectionAuth::Unknown { scheme },
    };

    tracing::debug!(
        "Loaded service connection {} for '{}' ({})",
        id,
        uri,
        auth.scheme_name()
    );
    Ok(ServiceConnection::new(uri, auth))
}

pub fn service_connections_from_endpoints<L>(
    ids: &[String],
    lookup: &L,
) -> Result<Vec<ServiceConnection>>
where
    L: Fn(&str) -> Option<String>,
{
    ids.iter()
        .map(|id| service_connection_from_endpoint(id, lookup))
        .collect()
}
