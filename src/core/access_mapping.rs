use crate::domain::model::AccessMapping;
use crate::utils::error::Result;
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;

const LOCATION_SERVICE_TYPE: &str = "LocationService2";
const PUBLIC_ACCESS_MAPPING_MONIKER: &str = "PublicAccessMapping";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LocationServiceData {
    #[serde(deserialize_with = "null_as_default")]
    access_mappings: Vec<AccessMappingEntry>,
    #[serde(deserialize_with = "null_as_default")]
    service_definitions: Vec<ServiceDefinition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AccessMappingEntry {
    #[serde(deserialize_with = "null_as_default")]
    moniker: String,
    #[serde(deserialize_with = "null_as_default")]
    access_point: String,
    virtual_directory: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ServiceDefinition {
    #[serde(deserialize_with = "null_as_default")]
    service_type: String,
    #[serde(deserialize_with = "null_as_default")]
    location_mappings: Vec<LocationMapping>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LocationMapping {
    #[serde(deserialize_with = "null_as_default")]
    access_mapping_moniker: String,
    #[serde(deserialize_with = "null_as_default")]
    location: String,
}

// 服務端常把空集合送成 null
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// URI prefixes the current identity may use against the packaging service.
#[derive(Debug, Clone, Default)]
pub struct PackagingAccessMappings {
    mappings: Vec<AccessMapping>,
}

impl PackagingAccessMappings {
    /// Decodes the `locationServiceData` block of a connection data response.
    pub fn from_location_service_data(data: &serde_json::Value) -> Result<Self> {
        if data.is_null() {
            return Ok(Self::default());
        }

        let parsed: LocationServiceData = serde_json::from_value(data.clone())?;

        // 優先使用 location service 自己的 location mappings
        let mut mappings: Vec<AccessMapping> = parsed
            .service_definitions
            .iter()
            .filter(|def| def.service_type.eq_ignore_ascii_case(LOCATION_SERVICE_TYPE))
            .flat_map(|def| def.location_mappings.iter())
            .filter(|mapping| !mapping.location.is_empty())
            .map(|mapping| AccessMapping {
                uri: with_trailing_slash(&mapping.location),
                is_public: is_public_moniker(&mapping.access_mapping_moniker),
            })
            .collect();

        if mappings.is_empty() {
            mappings = parsed
                .access_mappings
                .iter()
                .filter(|entry| !entry.access_point.is_empty())
                .map(|entry| AccessMapping {
                    uri: with_trailing_slash(&join_virtual_directory(
                        &entry.access_point,
                        entry.virtual_directory.as_deref(),
                    )),
                    is_public: is_public_moniker(&entry.moniker),
                })
                .collect();
        }

        tracing::debug!("Found {} packaging access mappings", mappings.len());
        Ok(Self { mappings })
    }

    pub fn from_mappings(mappings: Vec<AccessMapping>) -> Self {
        Self { mappings }
    }

    pub fn all_prefixes(&self) -> Vec<String> {
        dedup_in_order(self.mappings.iter())
    }

    pub fn public_prefixes(&self) -> Vec<String> {
        dedup_in_order(self.mappings.iter().filter(|mapping| mapping.is_public))
    }
}

fn dedup_in_order<'a>(mappings: impl Iterator<Item = &'a AccessMapping>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut prefixes = Vec::new();
    for mapping in mappings {
        if seen.insert(mapping.uri.as_str()) {
            prefixes.push(mapping.uri.clone());
        }
    }
    prefixes
}

fn is_public_moniker(moniker: &str) -> bool {
    moniker.eq_ignore_ascii_case(PUBLIC_ACCESS_MAPPING_MONIKER)
}

fn join_virtual_directory(access_point: &str, virtual_directory: Option<&str>) -> String {
    match virtual_directory.map(|dir| dir.trim_matches('/')) {
        Some(dir) if !dir.is_empty() => {
            format!("{}/{}", access_point.trim_end_matches('/'), dir)
        }
        _ => access_point.to_string(),
    }
}

fn with_trailing_slash(uri: &str) -> String {
    if uri.ends_with('/') {
        uri.to_string()
    } else {
        format!("{}/", uri)
    }
}
