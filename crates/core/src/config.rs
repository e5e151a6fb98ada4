//! Runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services that
//! need it. Request handlers never read process-wide environment variables, which keeps
//! behaviour consistent in multi-threaded runtimes and test harnesses.

use crate::constants::{
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_LISTEN_ADDR, DEFAULT_MAX_JOURNEYS_PER_FLOW,
    DEFAULT_REFERENCE_DATA_TTL_SECS, DEFAULT_SESSION_TTL_SECS,
};
use crate::{CoreError, CoreResult};
use std::time::Duration;
use url::Url;

/// Configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    listen_addr: String,
    api_base_url: String,
    api_timeout: Duration,
    reference_data_ttl: Duration,
    session_ttl: Duration,
    max_journeys_per_flow: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if the API base URL is not an absolute http(s) URL, if
    /// any duration is zero, or if `max_journeys_per_flow` is zero.
    pub fn new(
        listen_addr: String,
        api_base_url: String,
        api_timeout: Duration,
        reference_data_ttl: Duration,
        session_ttl: Duration,
        max_journeys_per_flow: usize,
    ) -> CoreResult<Self> {
        let api_base_url = normalise_base_url(&api_base_url)?;

        if api_timeout.is_zero() || reference_data_ttl.is_zero() || session_ttl.is_zero() {
            return Err(CoreError::InvalidConfig(
                "timeouts and TTLs must be greater than zero".into(),
            ));
        }
        if max_journeys_per_flow == 0 {
            return Err(CoreError::InvalidConfig(
                "max_journeys_per_flow must be at least 1".into(),
            ));
        }

        Ok(Self {
            listen_addr,
            api_base_url,
            api_timeout,
            reference_data_ttl,
            session_ttl,
            max_journeys_per_flow,
        })
    }

    /// Configuration with every default applied and the given API base URL.
    pub fn with_api_base_url(api_base_url: impl Into<String>) -> CoreResult<Self> {
        Self::new(
            DEFAULT_LISTEN_ADDR.into(),
            api_base_url.into(),
            Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_REFERENCE_DATA_TTL_SECS),
            Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            DEFAULT_MAX_JOURNEYS_PER_FLOW,
        )
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    /// Base URL of the contacts API, always ending in `/`.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn api_timeout(&self) -> Duration {
        self.api_timeout
    }

    pub fn reference_data_ttl(&self) -> Duration {
        self.reference_data_ttl
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn max_journeys_per_flow(&self) -> usize {
        self.max_journeys_per_flow
    }
}

fn normalise_base_url(raw: &str) -> CoreResult<String> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        CoreError::InvalidConfig(format!("contacts API URL '{raw}' is not a valid URL: {e}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CoreError::InvalidConfig(format!(
            "contacts API URL must use http or https, got '{raw}'"
        )));
    }
    if !url.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(CoreError::InvalidConfig(format!(
            "contacts API URL has no host: '{raw}'"
        )));
    }
    if url.cannot_be_a_base() || url.query().is_some() || url.fragment().is_some() {
        return Err(CoreError::InvalidConfig(format!(
            "contacts API URL must be a plain base URL, got '{raw}'"
        )));
    }
    let normalised = url.as_str();
    if normalised.ends_with('/') {
        Ok(normalised.to_string())
    } else {
        Ok(format!("{normalised}/"))
    }
}

/// Parse a number of seconds from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns `default_secs`.
pub fn duration_secs_from_env_value(
    name: &str,
    value: Option<String>,
    default_secs: u64,
) -> CoreResult<Duration> {
    let secs = parse_optional(name, value)?.unwrap_or(default_secs);
    Ok(Duration::from_secs(secs))
}

/// Parse a count from an optional environment value, falling back to `default`.
pub fn usize_from_env_value(name: &str, value: Option<String>, default: usize) -> CoreResult<usize> {
    Ok(parse_optional(name, value)?.unwrap_or(default))
}

fn parse_optional<T: std::str::FromStr>(name: &str, value: Option<String>) -> CoreResult<Option<T>> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<T>().map_err(|_| {
                CoreError::InvalidConfig(format!("{name} must be a non-negative integer, got '{v}'"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let cfg = CoreConfig::with_api_base_url("http://localhost:8080").unwrap();
        assert_eq!(cfg.api_base_url(), "http://localhost:8080/");

        let cfg = CoreConfig::with_api_base_url("https://contacts.example/api/").unwrap();
        assert_eq!(cfg.api_base_url(), "https://contacts.example/api/");
    }

    #[test]
    fn test_base_url_must_be_http() {
        assert!(CoreConfig::with_api_base_url("ftp://x").is_err());
        assert!(CoreConfig::with_api_base_url("localhost:8080").is_err());
        assert!(CoreConfig::with_api_base_url("http://").is_err());
        assert!(CoreConfig::with_api_base_url("https://exa mple").is_err());
        assert!(CoreConfig::with_api_base_url("http://:8080").is_err());
        assert!(CoreConfig::with_api_base_url("https://contacts.example/api?x=1").is_err());
    }

    #[test]
    fn test_zero_journey_cap_is_rejected() {
        let err = CoreConfig::new(
            DEFAULT_LISTEN_ADDR.into(),
            "http://localhost".into(),
            Duration::from_secs(1),
            Duration::from_secs(1),
            Duration::from_secs(1),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_env_values_fall_back_to_defaults() {
        assert_eq!(
            duration_secs_from_env_value("X", None, 30).unwrap(),
            Duration::from_secs(30)
        );
        assert_eq!(
            duration_secs_from_env_value("X", Some("  ".into()), 30).unwrap(),
            Duration::from_secs(30)
        );
        assert_eq!(
            duration_secs_from_env_value("X", Some("5".into()), 30).unwrap(),
            Duration::from_secs(5)
        );
        assert_eq!(usize_from_env_value("X", Some("7".into()), 5).unwrap(), 7);
        assert!(usize_from_env_value("X", Some("-1".into()), 5).is_err());
    }
}
