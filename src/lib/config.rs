use std::env;
use std::time::Duration;

use anyhow::Context;
use dotenv::dotenv;

const DEFAULT_DATABASE_NAME: &str = "berrytracer";
const DEFAULT_DEVICE_COLLECTION: &str = "device";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_port: String,
    pub database_url: String,
    pub database_name: String,
    pub device_collection: String,
    pub auth_service_url: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        // The environment may be fully populated already.
        dotenv().ok();

        Config::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let server_port = load(&lookup, "SERVER_PORT")?;
        let database_url = load(&lookup, "DATABASE_URL")?;
        let auth_service_url = load(&lookup, "AUTH_SERVICE_URL")?;
        let database_name =
            lookup("DATABASE_NAME").unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());
        let device_collection =
            lookup("DEVICE_COLLECTION").unwrap_or_else(|| DEFAULT_DEVICE_COLLECTION.to_string());
        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .map(Duration::from_secs)
                .with_context(|| format!("REQUEST_TIMEOUT_SECS is not a number of seconds: {}", raw))?,
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Config {
            server_port,
            database_url,
            database_name,
            device_collection,
            auth_service_url,
            request_timeout,
        })
    }
}

fn load(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<String> {
    lookup(key).with_context(|| format!("failed to load environment variable {}", key))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("SERVER_PORT", "50051"),
        ("DATABASE_URL", "mongodb://localhost:27017"),
        ("AUTH_SERVICE_URL", "http://localhost:50052"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(
            config,
            Config {
                server_port: "50051".to_string(),
                database_url: "mongodb://localhost:27017".to_string(),
                database_name: "berrytracer".to_string(),
                device_collection: "device".to_string(),
                auth_service_url: "http://localhost:50052".to_string(),
                request_timeout: Duration::from_secs(10),
            }
        );
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DATABASE_NAME", "registry"));
        pairs.push(("DEVICE_COLLECTION", "devices"));
        pairs.push(("REQUEST_TIMEOUT_SECS", "3"));

        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.database_name, "registry");
        assert_eq!(config.device_collection, "devices");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_missing_required_variable() {
        let err = Config::from_lookup(lookup_from(&REQUIRED[..2])).unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to load environment variable AUTH_SERVICE_URL"
        );
    }

    #[test]
    fn test_invalid_timeout() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("REQUEST_TIMEOUT_SECS", "soon"));

        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }
}
