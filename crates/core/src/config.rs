use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub token_ttl_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub jwt_secret: Option<String>,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://shopcart.db?mode=rwc".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            auth: AuthConfig {
                jwt_secret: String::new().into(),
                issuer: None,
                audience: None,
                token_ttl_secs: 3600,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("shopcart.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(auth) = patch.auth {
            if let Some(jwt_secret) = auth.jwt_secret {
                self.auth.jwt_secret = secret_value(jwt_secret);
            }
            if let Some(issuer) = auth.issuer {
                self.auth.issuer = Some(issuer);
            }
            if let Some(audience) = auth.audience {
                self.auth.audience = Some(audience);
            }
            if let Some(token_ttl_secs) = auth.token_ttl_secs {
                self.auth.token_ttl_secs = token_ttl_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHOPCART_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("SHOPCART_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("SHOPCART_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("SHOPCART_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("SHOPCART_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("SHOPCART_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("SHOPCART_SERVER_PORT") {
            self.server.port = parse_u16("SHOPCART_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("SHOPCART_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("SHOPCART_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("SHOPCART_AUTH_JWT_SECRET") {
            self.auth.jwt_secret = secret_value(value);
        }
        if let Some(value) = read_env("SHOPCART_AUTH_ISSUER") {
            self.auth.issuer = Some(value);
        }
        if let Some(value) = read_env("SHOPCART_AUTH_AUDIENCE") {
            self.auth.audience = Some(value);
        }
        if let Some(value) = read_env("SHOPCART_AUTH_TOKEN_TTL_SECS") {
            self.auth.token_ttl_secs = parse_u64("SHOPCART_AUTH_TOKEN_TTL_SECS", &value)?;
        }

        let log_level =
            read_env("SHOPCART_LOGGING_LEVEL").or_else(|| read_env("SHOPCART_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SHOPCART_LOGGING_FORMAT").or_else(|| read_env("SHOPCART_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(max_connections) = overrides.database_max_connections {
            self.database.max_connections = max_connections;
        }
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(jwt_secret) = overrides.jwt_secret {
            self.auth.jwt_secret = secret_value(jwt_secret);
        }
        if let Some(issuer) = overrides.auth_issuer {
            self.auth.issuer = Some(issuer);
        }
        if let Some(audience) = overrides.auth_audience {
            self.auth.audience = Some(audience);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_server(&self.server)?;
        validate_auth(&self.auth)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("shopcart.toml"), PathBuf::from("config/shopcart.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_auth(auth: &AuthConfig) -> Result<(), ConfigError> {
    let secret = auth.jwt_secret.expose_secret();
    if secret.trim().is_empty() {
        return Err(ConfigError::Validation(
            "auth.jwt_secret is required. Set SHOPCART_AUTH_JWT_SECRET or [auth] jwt_secret"
                .to_string(),
        ));
    }
    if secret.len() < MIN_JWT_SECRET_LEN {
        return Err(ConfigError::Validation(format!(
            "auth.jwt_secret must be at least {MIN_JWT_SECRET_LEN} bytes long"
        )));
    }

    if auth.token_ttl_secs == 0 {
        return Err(ConfigError::Validation(
            "auth.token_ttl_secs must be greater than zero".to_string(),
        ));
    }

    let blank = |value: &Option<String>| value.as_ref().is_some_and(|v| v.trim().is_empty());
    if blank(&auth.issuer) || blank(&auth.audience) {
        return Err(ConfigError::Validation(
            "auth.issuer and auth.audience must not be blank when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    server: Option<ServerPatch>,
    auth: Option<AuthPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthPatch {
    jwt_secret: Option<String>,
    issuer: Option<String>,
    audience: Option<String>,
    token_ttl_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes";

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_SHOPCART_SECRET", SECRET);

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("shopcart.toml");
            fs::write(
                &path,
                r#"
[auth]
jwt_secret = "${TEST_SHOPCART_SECRET}"
issuer = "shopcart-tests"

[server]
port = 9090
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.auth.jwt_secret.expose_secret() == SECRET,
                "jwt secret should be interpolated from environment",
            )?;
            ensure(config.auth.issuer.as_deref() == Some("shopcart-tests"), "issuer from file")?;
            ensure(config.server.port == 9090, "port should be loaded from file")?;
            ensure(config.listen_address() == "127.0.0.1:9090", "listen address should combine")?;
            Ok(())
        })();

        clear_vars(&["TEST_SHOPCART_SECRET"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SHOPCART_AUTH_JWT_SECRET", SECRET);
        env::set_var("SHOPCART_LOG_LEVEL", "warn");
        env::set_var("SHOPCART_LOG_FORMAT", "json");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "json logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["SHOPCART_AUTH_JWT_SECRET", "SHOPCART_LOG_LEVEL", "SHOPCART_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SHOPCART_DATABASE_URL", "sqlite://from-env.db");
        env::set_var("SHOPCART_AUTH_JWT_SECRET", "env-secret-that-is-at-least-32-bytes");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("shopcart.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://from-file.db"

[auth]
jwt_secret = "file-secret-that-is-at-least-32-bytes"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite://from-override.db",
                "override database url should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.auth.jwt_secret.expose_secret() == "env-secret-that-is-at-least-32-bytes",
                "env secret should win over file and defaults",
            )?;
            Ok(())
        })();

        clear_vars(&["SHOPCART_DATABASE_URL", "SHOPCART_AUTH_JWT_SECRET"]);
        result
    }

    #[test]
    fn validation_fails_fast_without_jwt_secret() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["SHOPCART_AUTH_JWT_SECRET"]);

        let error = match AppConfig::load(LoadOptions::default()) {
            Ok(_) => {
                return Err("expected validation failure but config load succeeded".to_string())
            }
            Err(error) => error,
        };
        let has_message = matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("auth.jwt_secret")
        );
        ensure(has_message, "validation failure should mention auth.jwt_secret")
    }

    #[test]
    fn short_secret_and_bad_port_are_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let short = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                jwt_secret: Some("too-short".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });
        ensure(
            matches!(short, Err(ConfigError::Validation(ref m)) if m.contains("at least")),
            "short secret should fail validation",
        )?;

        env::set_var("SHOPCART_SERVER_PORT", "not-a-port");
        let bad_port = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                jwt_secret: Some(SECRET.to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });
        clear_vars(&["SHOPCART_SERVER_PORT"]);

        ensure(
            matches!(
                bad_port,
                Err(ConfigError::InvalidEnvOverride { ref key, .. })
                    if key == "SHOPCART_SERVER_PORT"
            ),
            "unparseable port should name the offending variable",
        )
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                jwt_secret: Some(SECRET.to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;
        let debug = format!("{config:?}");

        ensure(!debug.contains(SECRET), "debug output should not contain jwt secret")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }
}
