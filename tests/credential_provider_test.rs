use anyhow::Result;
use feed_auth::adapters::progress::BufferedProgress;
use feed_auth::adapters::task_variables::TaskVariableWriter;
use feed_auth::core::credential_config::{
    build_endpoint_credentials, build_external_feed_endpoints_json, CredentialConfigBuilder,
};
use feed_auth::domain::model::{
    EndpointCredentialsContainer, ProtocolType, ServiceConnection, ServiceConnectionAuth,
};
use feed_auth::{CredProviderEngine, CredProviderError, HttpLocationApiFactory, LocationContext};
use httpmock::prelude::*;
use serde_json::json;

const JOB_TOKEN: &str = "job-access-token-5f2c";

fn username_password(uri: &str, username: &str, password: &str) -> ServiceConnection {
    ServiceConnection::new(
        uri,
        ServiceConnectionAuth::UsernamePassword {
            username: username.to_string(),
            password: password.to_string(),
        },
    )
}

fn token(uri: &str, token: &str) -> ServiceConnection {
    ServiceConnection::new(
        uri,
        ServiceConnectionAuth::Token {
            token: token.to_string(),
        },
    )
}

fn api_key(uri: &str, key: &str) -> ServiceConnection {
    ServiceConnection::new(
        uri,
        ServiceConnectionAuth::ApiKey {
            api_key: key.to_string(),
        },
    )
}

fn mock_packaging_service(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path_contains("/org/_apis/resourceAreas/");
        then.status(200)
            .json_body(json!({ "locationUrl": server.url("/pkgs/org/") }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/pkgs/org/_apis/connectionData")
            .query_param("connectOptions", "IncludeServices");
        then.status(200).json_body(json!({
            "authenticatedUser": {
                "customDisplayName": "",
                "providerDisplayName": "org Build Service"
            },
            "locationServiceData": {
                "serviceDefinitions": [{
                    "serviceType": "LocationService2",
                    "locationMappings": [
                        { "accessMappingMoniker": "HostGuidAccessMapping", "location": "https://pkgs.example/6c1d0f/" },
                        { "accessMappingMoniker": "PublicAccessMapping", "location": "https://pkgs.example/org/" },
                        { "accessMappingMoniker": "PublicAccessMapping", "location": "https://pkgs.example/org/" },
                        { "accessMappingMoniker": "CodexAccessMapping", "location": "https://org.pkgs.example" }
                    ]
                }]
            }
        }));
    });
}

/// 完整流程：解析服務位置、取得 connection data、組出所有設定值
#[tokio::test]
async fn test_configure_end_to_end() -> Result<()> {
    let server = MockServer::start();
    mock_packaging_service(&server);

    let progress = BufferedProgress::new();
    let engine = CredProviderEngine::new(
        HttpLocationApiFactory::new()?,
        LocationContext::new(server.url("/org/"), Some("Hosted".to_string())),
        JOB_TOKEN,
        progress.clone(),
    );
    let connections = vec![
        username_password("https://feed.one/v3/index.json", "alice", "pw-secret-1"),
        token("https://feed.two/v3/index.json", "tok-secret-2"),
    ];
    let mut writer = TaskVariableWriter::new(Vec::new());

    let config = engine
        .configure(ProtocolType::NuGet, Some(connections.as_slice()), &mut writer)
        .await?;

    assert_eq!(
        config.same_organization.uri_prefixes.value,
        "https://pkgs.example/6c1d0f/;https://pkgs.example/org/;https://org.pkgs.example/"
    );
    assert_eq!(config.same_organization.access_token.value, JOB_TOKEN);

    let endpoints = config.external_endpoints.clone().expect("external endpoints");
    let parsed: serde_json::Value = serde_json::from_str(&endpoints.value)?;
    assert_eq!(parsed["endpointCredentials"].as_array().map(Vec::len), Some(2));

    let printed = progress.contents();
    assert!(printed.contains("'org Build Service'"));
    assert!(printed.contains("  https://pkgs.example/org/"));
    assert!(!printed.contains("6c1d0f"));
    assert!(printed.contains("  https://feed.one/v3/index.json"));
    for secret in [JOB_TOKEN, "pw-secret-1", "tok-secret-2"] {
        assert!(!printed.contains(secret), "progress output leaked {}", secret);
    }

    // 寫出的 logging commands 要先遮蔽 secret
    let commands = String::from_utf8(writer.into_inner())?;
    let mask_index = commands.find(&format!("##vso[task.setsecret]{}", JOB_TOKEN));
    let set_index = commands.find("variable=VSS_NUGET_ACCESSTOKEN;");
    assert!(mask_index.is_some() && mask_index < set_index);
    assert!(commands.contains("variable=VSS_NUGET_EXTERNAL_FEED_ENDPOINTS;"));
    Ok(())
}

#[tokio::test]
async fn test_api_key_connection_fails_after_progress() -> Result<()> {
    let server = MockServer::start();
    mock_packaging_service(&server);

    let progress = BufferedProgress::new();
    let engine = CredProviderEngine::new(
        HttpLocationApiFactory::new()?,
        LocationContext::new(server.url("/org/"), Some("Hosted".to_string())),
        JOB_TOKEN,
        progress.clone(),
    );
    let connections = vec![token("https://a", "t1"), api_key("https://b", "k")];
    let mut writer = TaskVariableWriter::new(Vec::new());

    let err = engine
        .configure(ProtocolType::NuGet, Some(connections.as_slice()), &mut writer)
        .await
        .unwrap_err();

    match err {
        CredProviderError::UnsupportedAuthType { endpoint } => assert_eq!(endpoint, "https://b"),
        other => panic!("unexpected error: {other:?}"),
    }
    let lines = progress.lines();
    assert!(lines.contains(&"  https://a".to_string()));
    assert!(lines.contains(&"  https://b".to_string()));
    assert!(!progress.contents().contains("t1"));

    // 同組織的設定在服務連線失敗前就已經送出
    let commands = String::from_utf8(writer.into_inner())?;
    assert!(commands.contains(
        "variable=VSS_NUGET_URI_PREFIXES;issecret=false]https://pkgs.example/6c1d0f/;https://pkgs.example/org/;https://org.pkgs.example/"
    ));
    assert!(commands.contains(&format!(
        "variable=VSS_NUGET_ACCESSTOKEN;issecret=false]{}",
        JOB_TOKEN
    )));
    assert!(!commands.contains("VSS_NUGET_EXTERNAL_FEED_ENDPOINTS"));
    Ok(())
}

#[test]
fn test_token_entry_has_no_username_and_stable_field_order() -> Result<()> {
    let connections = vec![
        username_password("https://up", "user", "pass"),
        token("https://tok", "secret"),
    ];

    let json = build_external_feed_endpoints_json(Some(connections.as_slice()))?
        .expect("json document");

    let up = json.find(r#"{"endpoint":"https://up","username":"user","password":"pass"}"#);
    let tok = json.find(r#"{"endpoint":"https://tok","password":"secret"}"#);
    assert!(up.is_some());
    assert!(tok.is_some());
    assert!(!json.contains("null"));
    Ok(())
}

#[test]
fn test_empty_or_absent_connections() -> Result<()> {
    assert!(build_external_feed_endpoints_json(None)?.is_none());
    assert!(build_external_feed_endpoints_json(Some(&[][..]))?.is_none());

    let builder = CredentialConfigBuilder::new(BufferedProgress::new());
    assert!(builder.external_endpoints(None)?.is_none());
    Ok(())
}

#[test]
fn test_unrecognized_scheme_is_fatal() {
    let connections = vec![
        token("https://ok", "t"),
        ServiceConnection::new(
            "https://cert",
            ServiceConnectionAuth::Unknown {
                scheme: "Certificate".to_string(),
            },
        ),
    ];

    let result = build_external_feed_endpoints_json(Some(connections.as_slice()));

    assert!(matches!(
        result,
        Err(CredProviderError::InvalidServiceConnection { .. })
    ));
}

#[test]
fn test_serialized_container_parses_back() -> Result<()> {
    let connections = vec![
        username_password("https://one", "u1", "p1"),
        token("https://two", "t2"),
        username_password("https://three", "u3", "p;3\"quoted"),
    ];

    let container = build_endpoint_credentials(&connections)?;
    let json = build_external_feed_endpoints_json(Some(connections.as_slice()))?
        .expect("json document");
    let parsed: EndpointCredentialsContainer = serde_json::from_str(&json)?;

    assert_eq!(parsed.endpoint_credentials.len(), connections.len());
    assert_eq!(parsed, container);
    assert_eq!(parsed.endpoint_credentials[1].username, None);
    Ok(())
}
