use crate::utils::error::{CredProviderError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.is_empty() {
        return Err(CredProviderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(CredProviderError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CredProviderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let display = path.to_string_lossy();
    if display.is_empty() {
        return Err(CredProviderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if display.contains('\0') {
        return Err(CredProviderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 驗證非空字串；錯誤訊息不帶入值本身，避免洩漏 secret
pub fn validate_non_empty_secret(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CredProviderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("collection_uri", "https://dev.azure.com/org/").is_ok());
        assert!(validate_url("collection_uri", "http://tfs:8080/tfs/DefaultCollection").is_ok());
        assert!(validate_url("collection_uri", "").is_err());
        assert!(validate_url("collection_uri", "invalid-url").is_err());
        assert!(validate_url("collection_uri", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_secret_hides_value() {
        assert!(validate_non_empty_secret("access_token", "abc").is_ok());
        let err = validate_non_empty_secret("access_token", "   ").unwrap_err();
        assert!(err.to_string().contains("access_token"));
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("task_root", Path::new("/opt/task")).is_ok());
        assert!(validate_path("task_root", Path::new("")).is_err());
    }
}
