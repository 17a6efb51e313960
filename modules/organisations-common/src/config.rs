use std::env;
use std::time::Duration;

use crate::OrganisationsError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Neo4j
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,

    // Web server
    pub api_host: String,
    pub api_port: u16,

    /// Base for the `id` and `apiUrl` of every concept served.
    pub api_url: String,
    pub cache_duration: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, OrganisationsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, OrganisationsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| OrganisationsError::Config(format!("{key} environment variable is required")))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_port = or_default("API_PORT", "8080");
        let api_port = api_port
            .parse()
            .map_err(|_| OrganisationsError::Config(format!("API_PORT must be a number, got {api_port:?}")))?;

        Ok(Self {
            neo4j_uri: required("NEO4J_URI")?,
            neo4j_user: or_default("NEO4J_USER", "neo4j"),
            neo4j_password: required("NEO4J_PASSWORD")?,
            api_host: or_default("API_HOST", "0.0.0.0"),
            api_port,
            api_url: or_default("API_URL", "http://api.ft.com"),
            cache_duration: parse_cache_duration(&or_default("CACHE_DURATION", "30s"))?,
        })
    }

    /// Value of the `Cache-Control` header on successful organisation reads.
    pub fn cache_control(&self) -> String {
        format!("max-age={}, public", self.cache_duration.as_secs())
    }
}

/// Parse `30s`, `5m`, `1h` or a bare number of seconds.
pub fn parse_cache_duration(raw: &str) -> Result<Duration, OrganisationsError> {
    let raw = raw.trim();
    let invalid = || OrganisationsError::Config(format!("CACHE_DURATION is not a duration: {raw:?}"));
    let (digits, multiplier) = match raw.char_indices().last() {
        Some((i, 's')) => (&raw[..i], 1),
        Some((i, 'm')) => (&raw[..i], 60),
        Some((i, 'h')) => (&raw[..i], 3600),
        Some(_) => (raw, 1),
        None => return Err(invalid()),
    };
    let amount: u64 = digits.parse().map_err(|_| invalid())?;
    Ok(Duration::from_secs(amount * multiplier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_vars_set() {
        let config = Config::from_lookup(lookup(&[
            ("NEO4J_URI", "bolt://localhost:7687"),
            ("NEO4J_PASSWORD", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.neo4j_user, "neo4j");
        assert_eq!(config.api_host, "0.0.0.0");
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.api_url, "http://api.ft.com");
        assert_eq!(config.cache_control(), "max-age=30, public");
    }

    #[test]
    fn missing_uri_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[("NEO4J_PASSWORD", "secret")])).unwrap_err();
        assert!(err.to_string().contains("NEO4J_URI"));
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[
            ("NEO4J_URI", "bolt://localhost:7687"),
            ("NEO4J_PASSWORD", "secret"),
            ("API_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, OrganisationsError::Config(_)));
    }

    #[test]
    fn cache_duration_units() {
        assert_eq!(parse_cache_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_cache_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_cache_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_cache_duration("45").unwrap(), Duration::from_secs(45));
    }

    #[test]
    fn cache_duration_rejects_garbage() {
        assert!(parse_cache_duration("").is_err());
        assert!(parse_cache_duration("soon").is_err());
        assert!(parse_cache_duration("10d").is_err());
    }
}
