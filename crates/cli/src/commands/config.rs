use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use platey_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields: Vec<(&str, String, Option<&str>)> = vec![
        (
            "telegram.bot_token",
            redact_token(config.telegram.bot_token.expose_secret()),
            Some("PLATEY_BOT_TOKEN"),
        ),
        ("telegram.api_base_url", config.telegram.api_base_url.clone(), Some("PLATEY_API_BASE_URL")),
        (
            "telegram.poll_timeout_secs",
            config.telegram.poll_timeout_secs.to_string(),
            Some("PLATEY_POLL_TIMEOUT_SECS"),
        ),
        (
            "search.page_size_default",
            config.search.page_size_default.to_string(),
            Some("PLATEY_PAGE_SIZE"),
        ),
        ("search.max_results", config.search.max_results.to_string(), Some("PLATEY_MAX_RESULTS")),
        (
            "search.digit_strategy",
            format!("{:?}", config.search.digit_strategy).to_ascii_lowercase(),
            Some("PLATEY_DIGIT_STRATEGY"),
        ),
        (
            "search.message_limit_chars",
            config.search.message_limit_chars.to_string(),
            Some("PLATEY_MESSAGE_LIMIT"),
        ),
        (
            "search.ask_page_size",
            config.search.ask_page_size.to_string(),
            Some("PLATEY_ASK_PAGE_SIZE"),
        ),
        (
            "search.default_category",
            config.default_category().unwrap_or("<unset>").to_string(),
            Some("PLATEY_DEFAULT_CATEGORY"),
        ),
        ("logging.level", config.logging.level.clone(), Some("PLATEY_LOGGING_LEVEL")),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            Some("PLATEY_LOGGING_FORMAT"),
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_key) in fields {
        let source =
            field_source(key, env_key, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(format!("- {key} = {value} (source: {source})"));
    }

    lines.push(format!("catalog bindings: {}", config.catalogs.len()));
    for binding in &config.catalogs {
        lines.push(format!("  - {} ({})", binding.name, binding.label));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("platey.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/platey.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
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

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((bot_id, _)) = trimmed.split_once(':') {
        return format!("{bot_id}:***");
    }

    "<redacted>".to_string()
}
