use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub property_service: PropertyServiceConfig,
    pub booking_service: BookingServiceConfig,
    #[serde(default)]
    pub internal: InternalConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string. Without one the service keeps its rows in memory.
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct PropertyServiceConfig {
    pub url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl PropertyServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_timeout_seconds() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingServiceConfig {
    pub url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl BookingServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct InternalConfig {
    /// Shared key required on property-internal calls when set.
    pub auth_key: Option<String>,
}

impl Config {
    /// Loads the configuration of `service` ("property", "booking" or "gateway").
    pub fn load(service: &str) -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"), service)
    }

    pub fn load_from(dir: &Path, service: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let file = |name: &str| {
            config::File::with_name(&dir.join(name).to_string_lossy())
        };

        let s = config::Config::builder()
            .add_source(file("default"))
            // Per-service overrides such as the listening port
            .add_source(file(service).required(false))
            .add_source(file(&run_mode).required(false))
            // Not checked in
            .add_source(file("local").required(false))
            // Eg.. `HAVEN__SERVER__PORT=9000` overrides `server.port`
            .add_source(config::Environment::with_prefix("HAVEN").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_apply() {
        let config = parse(
            r#"
            [server]
            port = 50052

            [property_service]
            url = "http://127.0.0.1:50051"

            [booking_service]
            url = "http://127.0.0.1:50052"
            "#,
        );

        assert_eq!(config.server.port, 50052);
        assert!(config.database.url.is_none());
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.property_service.timeout(), Duration::from_secs(10));
        assert!(config.internal.auth_key.is_none());
    }

    #[test]
    fn test_explicit_values_win() {
        let config = parse(
            r#"
            [server]
            port = 8080

            [database]
            url = "postgres://haven@localhost/property"
            max_connections = 12

            [property_service]
            url = "http://property:50051"
            timeout_seconds = 3

            [booking_service]
            url = "http://booking:50052"

            [internal]
            auth_key = "s3cret"
            "#,
        );

        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://haven@localhost/property")
        );
        assert_eq!(config.database.max_connections, 12);
        assert_eq!(config.property_service.timeout(), Duration::from_secs(3));
        assert_eq!(config.internal.auth_key.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_checked_in_config_files_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config");
        for service in ["property", "booking", "gateway"] {
            let config = Config::load_from(&dir, service).unwrap();
            assert!(config.property_service.url.starts_with("http://"));
        }
    }
}
