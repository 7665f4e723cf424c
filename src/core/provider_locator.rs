use crate::utils::error::{CredProviderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const NETFX_RELATIVE_PATH: &str =
    "CredentialProviderV2/plugins/netfx/CredentialProvider.Microsoft/CredentialProvider.Microsoft.exe";
const NETCORE_RELATIVE_PATH: &str =
    "CredentialProviderV2/plugins/netcore/CredentialProvider.Microsoft/CredentialProvider.Microsoft.dll";

/// 憑證提供者的兩種打包方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialProviderVariant {
    /// Windows-only executable for .NET Framework tools such as nuget.exe and MSBuild.
    NetFx,
    /// Cross-platform assembly loaded as a plugin by the .NET runtime.
    NetCore,
}

impl CredentialProviderVariant {
    fn relative_path(&self) -> &'static str {
        match self {
            CredentialProviderVariant::NetFx => NETFX_RELATIVE_PATH,
            CredentialProviderVariant::NetCore => NETCORE_RELATIVE_PATH,
        }
    }

    pub fn is_supported_on_current_os(&self) -> bool {
        match self {
            CredentialProviderVariant::NetFx => cfg!(windows),
            CredentialProviderVariant::NetCore => true,
        }
    }

    pub fn ensure_supported(&self) -> Result<()> {
        if self.is_supported_on_current_os() {
            Ok(())
        } else {
            Err(CredProviderError::UnsupportedPlatform {
                variant: self.to_string(),
            })
        }
    }
}

impl fmt::Display for CredentialProviderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialProviderVariant::NetFx => write!(f, "netfx"),
            CredentialProviderVariant::NetCore => write!(f, "netcore"),
        }
    }
}

impl FromStr for CredentialProviderVariant {
    type Err = CredProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "netfx" => Ok(CredentialProviderVariant::NetFx),
            "netcore" => Ok(CredentialProviderVariant::NetCore),
            other => Err(CredProviderError::InvalidConfigValueError {
                field: "credential_provider.variant".to_string(),
                value: other.to_string(),
                reason: "Expected netfx or netcore".to_string(),
            }),
        }
    }
}

/// Pure path computation; nothing here touches the filesystem.
#[derive(Debug, Clone)]
pub struct CredentialProviderLocator {
    task_root: PathBuf,
}

impl CredentialProviderLocator {
    pub fn new(task_root: impl Into<PathBuf>) -> Self {
        Self {
            task_root: task_root.into(),
        }
    }

    pub fn task_root(&self) -> &Path {
        &self.task_root
    }

    pub fn locate(&self, variant: CredentialProviderVariant) -> PathBuf {
        self.task_root.join(variant.relative_path())
    }

    pub fn locate_netfx(&self) -> PathBuf {
        self.locate(CredentialProviderVariant::NetFx)
    }

    pub fn locate_netcore(&self) -> PathBuf {
        self.locate(CredentialProviderVariant::NetCore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_variants() {
        let locator = CredentialProviderLocator::new("/agent/tasks/DotNetAuthenticate/0.1.0");

        assert_eq!(
            locator.locate_netcore(),
            Path::new("/agent/tasks/DotNetAuthenticate/0.1.0")
                .join("CredentialProviderV2/plugins/netcore/CredentialProvider.Microsoft/CredentialProvider.Microsoft.dll")
        );
        assert!(locator
            .locate_netfx()
            .ends_with("CredentialProvider.Microsoft/CredentialProvider.Microsoft.exe"));
        assert!(locator.locate_netfx().starts_with(locator.task_root()));
    }

    #[test]
    fn test_locate_does_not_require_existing_paths() {
        let locator = CredentialProviderLocator::new("/does/not/exist");
        assert!(!locator.locate(CredentialProviderVariant::NetCore).exists());
    }

    #[test]
    fn test_variant_parsing_and_support() {
        assert_eq!(
            "NetCore".parse::<CredentialProviderVariant>().unwrap(),
            CredentialProviderVariant::NetCore
        );
        assert!("dotnet".parse::<CredentialProviderVariant>().is_err());
        assert!(CredentialProviderVariant::NetCore.ensure_supported().is_ok());
        assert_eq!(
            CredentialProviderVariant::NetFx.ensure_supported().is_ok(),
            cfg!(windows)
        );
    }
}
