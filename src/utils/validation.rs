use crate::utils::error::{PortalError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PortalError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Request paths are joined onto the portal base URL, so they must be absolute.
pub fn validate_url_path(field_name: &str, path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path must start with '/'".to_string(),
        });
    }

    if path.contains(char::is_whitespace) {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot contain whitespace".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("portal.base_url", "http://172.24.66.1:8090").is_ok());
        assert!(validate_url("portal.base_url", "https://portal.example.com").is_ok());
        assert!(validate_url("portal.base_url", "").is_err());
        assert!(validate_url("portal.base_url", "invalid-url").is_err());
        assert!(validate_url("portal.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_url_path() {
        assert!(validate_url_path("portal.login_path", "/login.xml").is_ok());
        assert!(validate_url_path("portal.login_path", "login.xml").is_err());
        assert!(validate_url_path("portal.login_path", "/log in.xml").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("reachability.max_attempts", 10, 1).is_ok());
        assert!(validate_positive_number("reachability.max_attempts", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range_and_strings() {
        assert!(validate_range("probe.timeout_seconds", 5, 1, 120).is_ok());
        assert!(validate_range("probe.timeout_seconds", 0, 1, 120).is_err());
        assert!(validate_non_empty_string("probe.success_marker", "Success").is_ok());
        assert!(validate_non_empty_string("probe.success_marker", "  ").is_err());
    }
}
