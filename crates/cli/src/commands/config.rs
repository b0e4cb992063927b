use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use shopcart_core::config::{AppConfig, LoadOptions};
use toml::Value;

struct Entry {
    key: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for entry in entries(&config) {
        let source = field_source(
            entry.key,
            entry.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(format!("- {} = {} (source: {source})", entry.key, entry.value));
    }

    lines.join("\n")
}

fn entries(config: &AppConfig) -> Vec<Entry> {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "<unset>".to_string());

    vec![
        Entry {
            key: "database.url",
            env_keys: &["SHOPCART_DATABASE_URL"],
            value: config.database.url.clone(),
        },
        Entry {
            key: "database.max_connections",
            env_keys: &["SHOPCART_DATABASE_MAX_CONNECTIONS"],
            value: config.database.max_connections.to_string(),
        },
        Entry {
            key: "database.timeout_secs",
            env_keys: &["SHOPCART_DATABASE_TIMEOUT_SECS"],
            value: config.database.timeout_secs.to_string(),
        },
        Entry {
            key: "server.bind_address",
            env_keys: &["SHOPCART_SERVER_BIND_ADDRESS"],
            value: config.server.bind_address.clone(),
        },
        Entry {
            key: "server.port",
            env_keys: &["SHOPCART_SERVER_PORT"],
            value: config.server.port.to_string(),
        },
        Entry {
            key: "server.graceful_shutdown_secs",
            env_keys: &["SHOPCART_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            value: config.server.graceful_shutdown_secs.to_string(),
        },
        Entry {
            key: "auth.jwt_secret",
            env_keys: &["SHOPCART_AUTH_JWT_SECRET"],
            value: redact_secret(config.auth.jwt_secret.expose_secret()),
        },
        Entry {
            key: "auth.issuer",
            env_keys: &["SHOPCART_AUTH_ISSUER"],
            value: optional(&config.auth.issuer),
        },
        Entry {
            key: "auth.audience",
            env_keys: &["SHOPCART_AUTH_AUDIENCE"],
            value: optional(&config.auth.audience),
        },
        Entry {
            key: "auth.token_ttl_secs",
            env_keys: &["SHOPCART_AUTH_TOKEN_TTL_SECS"],
            value: config.auth.token_ttl_secs.to_string(),
        },
        Entry {
            key: "logging.level",
            env_keys: &["SHOPCART_LOGGING_LEVEL", "SHOPCART_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Entry {
            key: "logging.format",
            env_keys: &["SHOPCART_LOGGING_FORMAT", "SHOPCART_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("shopcart.toml"), PathBuf::from("config/shopcart.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn redact_secret(secret: &str) -> String {
    if secret.trim().is_empty() {
        return "<empty>".to_string();
    }
    format!("<redacted, {} bytes>", secret.len())
}

#[cfg(test)]
mod tests {
    use super::{contains_path, redact_secret};

    #[test]
    fn secrets_are_never_echoed() {
        let rendered = redact_secret("super-secret-signing-key-0123456789");

        assert!(!rendered.contains("super-secret"));
        assert_eq!(rendered, "<redacted, 35 bytes>");
        assert_eq!(redact_secret("  "), "<empty>");
    }

    #[test]
    fn dotted_paths_resolve_into_nested_tables() {
        let doc: toml::Value = "[auth]\nissuer = \"shopcart\"\n".parse().expect("toml");

        assert!(contains_path(&doc, "auth.issuer"));
        assert!(!contains_path(&doc, "auth.audience"));
        assert!(!contains_path(&doc, "server.port"));
    }
}
