//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use smart_default::SmartDefault;

/// Settings of the contract server.
///
/// Every section may be omitted, falling back to its defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings.
    pub server: Server,

    /// Session issuing settings.
    pub service: Service,

    /// Connection to the contracts database.
    pub postgres: Postgres,

    /// Logging settings.
    pub log: Log,
}

impl Config {
    /// Prefix of the environment variables overriding file values, like
    /// `CONF.SERVER.PORT`.
    pub const ENV_PREFIX: &'static str = "CONF";

    /// Loads a [`Config`] from the optional file at `path`, with the
    /// [`Config::ENV_PREFIX`]ed environment variables layered on top.
    ///
    /// # Errors
    ///
    /// If some provided value has a wrong type.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .separator("."),
            )
            .build()?
            .try_deserialize()
    }
}

/// HTTP listener settings.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Interface to listen on.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to listen on.
    #[default(8080)]
    pub port: u16,

    /// Origins allowed to call the API from a browser.
    pub cors: Cors,
}

impl Server {
    /// Returns the `host:port` pair to listen on.
    #[must_use]
    pub fn address(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

/// [CORS] settings of the contract editor frontends.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// Allowed origins, `*` allowing any.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Session issuing settings.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// Secret signing the session tokens.
    #[default("secret".to_owned())]
    pub jwt_secret: String,

    /// How long an issued session token stays valid.
    #[default(time::Duration::from_secs(60 * 60 * 24 * 7))]
    #[serde(with = "humantime_serde")]
    pub session_ttl: time::Duration,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        Self::with_secret(value.jwt_secret.as_bytes(), value.session_ttl)
    }
}

/// Connection to the contracts database.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Database server host.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Database server port.
    #[default(5432)]
    pub port: u16,

    /// Role to log in as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password of the [`Postgres::user`].
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database holding the `users` and `contracts` tables.
    #[default("postgres".to_owned())]
    pub dbname: String,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        Self {
            host: Some(value.host),
            port: Some(value.port),
            user: Some(value.user),
            password: Some(value.password),
            dbname: Some(value.dbname),
            ..Self::default()
        }
    }
}

/// Logging settings.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Most verbose [`LogLevel`] to emit.
    pub level: LogLevel,
}

/// Verbosity of the emitted logs.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Statements executed against the database.
    Trace,

    /// Request handling details.
    Debug,

    /// Started server, created and deleted contracts.
    #[default]
    Info,

    /// Rejected requests.
    Warn,

    /// Server failures only.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::{Config, LogLevel};

    #[test]
    fn defaults_without_file() {
        let config = Config::new("definitely-missing.toml").unwrap();

        assert_eq!(config.server.address(), ("0.0.0.0", 8080));
        assert_eq!(config.server.cors.origins, ["*"]);
        assert_eq!(config.postgres.dbname, "postgres");
        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(
            config.service.session_ttl,
            Duration::from_secs(60 * 60 * 24 * 7),
        );
    }
}
