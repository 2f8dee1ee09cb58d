// Client configuration, constructed once and passed down explicitly.
//
// Responsibilities
// - Read the backend base URL and session settings from the environment (and `.env`).
// - Validate them up front so a bad base URL fails at start-up, not on the first request.

use reqwest::Url;
use std::path::PathBuf;
use thiserror::Error;

pub const API_BASE_VAR: &str = "TIMESHEET_API_BASE";
pub const TOKEN_FILE_VAR: &str = "TIMESHEET_TOKEN_FILE";
pub const REFRESH_VAR: &str = "TIMESHEET_REFRESH_ON_401";
pub const DEFAULT_TOKEN_FILE: &str = ".timesheet-session";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Always ends with `/` so relative paths resolve beneath it.
    pub api_base: Url,
    pub token_file: PathBuf,
    /// Warm up the session and retry once when a request gets 401.
    pub refresh_on_unauthorized: bool,
}

impl ClientConfig {
    pub fn new(api_base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: normalise_base(api_base)?,
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            refresh_on_unauthorized: true,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base = lookup(API_BASE_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(API_BASE_VAR))?;

        let mut config = Self::new(&api_base)?;

        if let Some(path) = lookup(TOKEN_FILE_VAR).filter(|v| !v.trim().is_empty()) {
            config.token_file = PathBuf::from(path);
        }

        if let Some(raw) = lookup(REFRESH_VAR) {
            config.refresh_on_unauthorized = parse_flag(REFRESH_VAR, &raw)?;
        }

        Ok(config)
    }

    pub fn with_refresh_on_unauthorized(mut self, enabled: bool) -> Self {
        self.refresh_on_unauthorized = enabled;
        self
    }

    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = path.into();
        self
    }
}

fn normalise_base(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{trimmed}/")).map_err(|e| ConfigError::Invalid {
        name: API_BASE_VAR,
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            name: API_BASE_VAR,
            reason: format!("{raw} is not an http(s) base url"),
        });
    }
    Ok(url)
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            name,
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}

#[cfg(test)]
mod client_config_tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[rstest]
    fn it_should_apply_defaults_when_only_the_base_is_set() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[(API_BASE_VAR, "https://api.example.com")]))
                .unwrap();
        assert_eq!(config.api_base.as_str(), "https://api.example.com/");
        assert_eq!(config.token_file, PathBuf::from(DEFAULT_TOKEN_FILE));
        assert!(config.refresh_on_unauthorized);
    }

    #[rstest]
    #[case("https://api.example.com/v1", "https://api.example.com/v1/")]
    #[case("https://api.example.com/v1///", "https://api.example.com/v1/")]
    #[case(" http://localhost:8000 ", "http://localhost:8000/")]
    fn it_should_normalise_the_base_url(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(ClientConfig::new(raw).unwrap().api_base.as_str(), expected);
    }

    #[rstest]
    fn it_should_fail_when_the_base_is_missing() {
        let result = ClientConfig::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing(API_BASE_VAR));
    }

    #[rstest]
    #[case("ftp://files.example.com")]
    #[case("not a url")]
    fn it_should_reject_non_http_bases(#[case] raw: &str) {
        assert!(matches!(
            ClientConfig::new(raw),
            Err(ConfigError::Invalid { name: API_BASE_VAR, .. })
        ));
    }

    #[rstest]
    fn it_should_read_the_token_file_and_refresh_flag() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (API_BASE_VAR, "https://api.example.com"),
            (TOKEN_FILE_VAR, "/tmp/session"),
            (REFRESH_VAR, "off"),
        ]))
        .unwrap();
        assert_eq!(config.token_file, PathBuf::from("/tmp/session"));
        assert!(!config.refresh_on_unauthorized);
    }

    #[rstest]
    fn it_should_reject_a_malformed_refresh_flag() {
        let result = ClientConfig::from_lookup(lookup_from(&[
            (API_BASE_VAR, "https://api.example.com"),
            (REFRESH_VAR, "sometimes"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: REFRESH_VAR, .. })));
    }
}
