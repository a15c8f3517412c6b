use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::DigitStrategy;
use crate::session::{PAGE_SIZE_MAX, PAGE_SIZE_MIN};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub search: SearchConfig,
    pub catalogs: Vec<CatalogBinding>,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct TelegramConfig {
    pub bot_token: SecretString,
    pub api_base_url: String,
    pub poll_timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub page_size_default: usize,
    pub max_results: usize,
    pub digit_strategy: DigitStrategy,
    pub message_limit_chars: usize,
    /// When true, a browse selection asks for a page size first; when
    /// false it goes straight to page zero with the default size.
    pub ask_page_size: bool,
    pub default_category: Option<String>,
}

/// One category and where its rows come from. The category→source binding
/// is configuration data: adding a catalog is a TOML edit, not new
/// control flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogBinding {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub source: SourceSpec,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSpec {
    /// Flat file, one plate per non-blank line.
    Text { path: PathBuf },
    /// Delimited rows: plate, region, price, comment.
    Delimited {
        path: PathBuf,
        #[serde(default = "default_delimiter")]
        delimiter: char,
    },
    /// Published-CSV sheet export fetched over HTTP.
    Sheet { url: String },
}

fn default_delimiter() -> char {
    ';'
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
    pub bot_token: Option<String>,
    pub log_level: Option<String>,
    pub digit_strategy: Option<DigitStrategy>,
    pub default_category: Option<String>,
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
            telegram: TelegramConfig {
                bot_token: String::new().into(),
                api_base_url: "https://api.telegram.org".to_string(),
                poll_timeout_secs: 30,
            },
            search: SearchConfig {
                page_size_default: 20,
                max_results: 50,
                digit_strategy: DigitStrategy::Suffix,
                message_limit_chars: 4000,
                ask_page_size: false,
                default_category: None,
            },
            catalogs: Vec::new(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
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
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("platey.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// The category an implicit free-text query runs against: the
    /// configured default, or the first binding.
    pub fn default_category(&self) -> Option<&str> {
        self.search
            .default_category
            .as_deref()
            .or_else(|| self.catalogs.first().map(|binding| binding.name.as_str()))
    }

    pub fn binding(&self, name: &str) -> Option<&CatalogBinding> {
        self.catalogs.iter().find(|binding| binding.name == name)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(telegram) = patch.telegram {
            if let Some(bot_token_value) = telegram.bot_token {
                self.telegram.bot_token = bot_token_value.into();
            }
            if let Some(api_base_url) = telegram.api_base_url {
                self.telegram.api_base_url = api_base_url;
            }
            if let Some(poll_timeout_secs) = telegram.poll_timeout_secs {
                self.telegram.poll_timeout_secs = poll_timeout_secs;
            }
        }

        if let Some(search) = patch.search {
            if let Some(page_size_default) = search.page_size_default {
                self.search.page_size_default = page_size_default;
            }
            if let Some(max_results) = search.max_results {
                self.search.max_results = max_results;
            }
            if let Some(digit_strategy) = search.digit_strategy {
                self.search.digit_strategy = digit_strategy;
            }
            if let Some(message_limit_chars) = search.message_limit_chars {
                self.search.message_limit_chars = message_limit_chars;
            }
            if let Some(ask_page_size) = search.ask_page_size {
                self.search.ask_page_size = ask_page_size;
            }
            if let Some(default_category) = search.default_category {
                self.search.default_category = Some(default_category);
            }
        }

        if let Some(catalogs) = patch.catalogs {
            self.catalogs = catalogs;
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
        if let Some(value) = read_env("PLATEY_BOT_TOKEN") {
            self.telegram.bot_token = value.into();
        }
        if let Some(value) = read_env("PLATEY_API_BASE_URL") {
            self.telegram.api_base_url = value;
        }
        if let Some(value) = read_env("PLATEY_POLL_TIMEOUT_SECS") {
            self.telegram.poll_timeout_secs = parse_u64("PLATEY_POLL_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("PLATEY_PAGE_SIZE") {
            self.search.page_size_default = parse_usize("PLATEY_PAGE_SIZE", &value)?;
        }
        if let Some(value) = read_env("PLATEY_MAX_RESULTS") {
            self.search.max_results = parse_usize("PLATEY_MAX_RESULTS", &value)?;
        }
        if let Some(value) = read_env("PLATEY_DIGIT_STRATEGY") {
            self.search.digit_strategy = value.parse()?;
        }
        if let Some(value) = read_env("PLATEY_MESSAGE_LIMIT") {
            self.search.message_limit_chars = parse_usize("PLATEY_MESSAGE_LIMIT", &value)?;
        }
        if let Some(value) = read_env("PLATEY_ASK_PAGE_SIZE") {
            self.search.ask_page_size = parse_bool("PLATEY_ASK_PAGE_SIZE", &value)?;
        }
        if let Some(value) = read_env("PLATEY_DEFAULT_CATEGORY") {
            self.search.default_category = Some(value);
        }

        let log_level = read_env("PLATEY_LOGGING_LEVEL").or_else(|| read_env("PLATEY_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PLATEY_LOGGING_FORMAT").or_else(|| read_env("PLATEY_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bot_token) = overrides.bot_token {
            self.telegram.bot_token = bot_token.into();
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(digit_strategy) = overrides.digit_strategy {
            self.search.digit_strategy = digit_strategy;
        }
        if let Some(default_category) = overrides.default_category {
            self.search.default_category = Some(default_category);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_telegram(&self.telegram)?;
        validate_search(&self.search)?;
        validate_catalogs(&self.catalogs, self.search.default_category.as_deref())?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("platey.toml"), PathBuf::from("config/platey.toml")]
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

/// Replaces `${VAR}` occurrences with the value of `VAR`; a reference to
/// an unset variable is an error rather than an empty string.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(ConfigError::UnterminatedInterpolation);
        };
        let key = &after[..end];
        let value = env::var(key)
            .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.to_owned() })?;
        output.push_str(&value);
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

fn validate_telegram(telegram: &TelegramConfig) -> Result<(), ConfigError> {
    let token = telegram.bot_token.expose_secret();
    if token.trim().is_empty() {
        return Err(ConfigError::Validation(
            "telegram.bot_token is required. Create a bot with @BotFather and copy its token"
                .to_string(),
        ));
    }

    let well_formed = token.split_once(':').is_some_and(|(id, secret)| {
        !id.is_empty() && id.chars().all(|ch| ch.is_ascii_digit()) && !secret.is_empty()
    });
    if !well_formed {
        return Err(ConfigError::Validation(
            "telegram.bot_token must look like `<numeric id>:<secret>` as issued by @BotFather"
                .to_string(),
        ));
    }

    if telegram.api_base_url.trim().is_empty() {
        return Err(ConfigError::Validation("telegram.api_base_url must not be empty".to_string()));
    }

    if telegram.poll_timeout_secs == 0 || telegram.poll_timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "telegram.poll_timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_search(search: &SearchConfig) -> Result<(), ConfigError> {
    if !(PAGE_SIZE_MIN..=PAGE_SIZE_MAX).contains(&search.page_size_default) {
        return Err(ConfigError::Validation(format!(
            "search.page_size_default must be in range {PAGE_SIZE_MIN}..={PAGE_SIZE_MAX}"
        )));
    }

    if search.max_results == 0 {
        return Err(ConfigError::Validation(
            "search.max_results must be greater than zero".to_string(),
        ));
    }

    if search.message_limit_chars == 0 {
        return Err(ConfigError::Validation(
            "search.message_limit_chars must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_catalogs(
    catalogs: &[CatalogBinding],
    default_category: Option<&str>,
) -> Result<(), ConfigError> {
    if catalogs.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[catalogs]] binding is required".to_string(),
        ));
    }

    for (index, binding) in catalogs.iter().enumerate() {
        if binding.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "catalogs[{index}].name must not be empty"
            )));
        }
        if binding.label.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "catalogs[{index}].label must not be empty"
            )));
        }
        let duplicate = catalogs[..index].iter().any(|earlier| earlier.name == binding.name);
        if duplicate {
            return Err(ConfigError::Validation(format!(
                "catalogs contain duplicate name `{}`",
                binding.name
            )));
        }
    }

    if let Some(default_category) = default_category {
        let known = catalogs.iter().any(|binding| binding.name == default_category);
        if !known {
            return Err(ConfigError::Validation(format!(
                "search.default_category `{default_category}` does not name a configured catalog"
            )));
        }
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

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    telegram: Option<TelegramPatch>,
    search: Option<SearchPatch>,
    catalogs: Option<Vec<CatalogBinding>>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct TelegramPatch {
    bot_token: Option<String>,
    api_base_url: Option<String>,
    poll_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchPatch {
    page_size_default: Option<usize>,
    max_results: Option<usize>,
    digit_strategy: Option<DigitStrategy>,
    message_limit_chars: Option<usize>,
    ask_page_size: Option<bool>,
    default_category: Option<String>,
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

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, SourceSpec};
    use crate::query::DigitStrategy;

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

    const CATALOG_TOML: &str = r#"
[[catalogs]]
name = "moto"
label = "Мото номера"
kind = "text"
path = "moto_numbers.txt"

[[catalogs]]
name = "auto"
label = "Авто номера"
kind = "delimited"
path = "auto.csv"
delimiter = ";"

[[catalogs]]
name = "msk"
label = "Москва"
kind = "sheet"
url = "https://example.invalid/sheet.csv"
"#;

    #[test]
    fn file_load_parses_catalog_bindings() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        env::set_var("PLATEY_BOT_TOKEN", "42:test-token");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("platey.toml");
            fs::write(&path, CATALOG_TOML).map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.catalogs.len() == 3, "three catalog bindings should parse")?;
            ensure(
                matches!(config.catalogs[0].source, SourceSpec::Text { .. }),
                "first binding should be a text source",
            )?;
            ensure(
                matches!(config.catalogs[1].source, SourceSpec::Delimited { delimiter: ';', .. }),
                "second binding should be a delimited source",
            )?;
            ensure(
                matches!(config.catalogs[2].source, SourceSpec::Sheet { .. }),
                "third binding should be a sheet source",
            )?;
            ensure(
                config.default_category() == Some("moto"),
                "default category should fall back to the first binding",
            )?;
            Ok(())
        })();

        clear_vars(&["PLATEY_BOT_TOKEN"]);
        result
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        env::set_var("TEST_PLATEY_TOKEN", "99:interpolated");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("platey.toml");
            let body =
                format!("[telegram]\nbot_token = \"${{TEST_PLATEY_TOKEN}}\"\n{CATALOG_TOML}");
            fs::write(&path, body).map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.telegram.bot_token.expose_secret() == "99:interpolated",
                "bot token should be interpolated from the environment",
            )?;
            Ok(())
        })();

        clear_vars(&["TEST_PLATEY_TOKEN"]);
        result
    }

    #[test]
    fn precedence_is_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PLATEY_BOT_TOKEN", "7:from-env");
        env::set_var("PLATEY_PAGE_SIZE", "10");
        env::set_var("PLATEY_DIGIT_STRATEGY", "substring");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("platey.toml");
            let body = format!(
                "[telegram]\nbot_token = \"1:from-file\"\n\n[search]\npage_size_default = 30\n{CATALOG_TOML}"
            );
            fs::write(&path, body).map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    digit_strategy: Some(DigitStrategy::Suffix),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.telegram.bot_token.expose_secret() == "7:from-env",
                "env token should win over the file token",
            )?;
            ensure(config.search.page_size_default == 10, "env page size should win over file")?;
            ensure(
                config.search.digit_strategy == DigitStrategy::Suffix,
                "explicit override should win over env strategy",
            )?;
            ensure(config.logging.level == "debug", "override log level should win")?;
            Ok(())
        })();

        clear_vars(&["PLATEY_BOT_TOKEN", "PLATEY_PAGE_SIZE", "PLATEY_DIGIT_STRATEGY"]);
        result
    }

    #[test]
    fn validation_names_the_offending_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PLATEY_BOT_TOKEN", "not-a-token");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("platey.toml");
            fs::write(&path, CATALOG_TOML).map_err(|err| err.to_string())?;

            let error = match AppConfig::load(LoadOptions {
                config_path: Some(path),
                ..LoadOptions::default()
            }) {
                Ok(_) => return Err("token without a colon should fail validation".to_string()),
                Err(error) => error,
            };
            let named = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("telegram.bot_token")
            );
            ensure(named, "validation failure should mention telegram.bot_token")
        })();

        clear_vars(&["PLATEY_BOT_TOKEN"]);
        result
    }

    #[test]
    fn page_size_out_of_range_fails_validation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PLATEY_BOT_TOKEN", "42:token");
        env::set_var("PLATEY_PAGE_SIZE", "150");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("platey.toml");
            fs::write(&path, CATALOG_TOML).map_err(|err| err.to_string())?;

            let error = match AppConfig::load(LoadOptions {
                config_path: Some(path),
                ..LoadOptions::default()
            }) {
                Ok(_) => return Err("page size 150 should fail validation".to_string()),
                Err(error) => error,
            };
            let named = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("page_size_default")
            );
            ensure(named, "validation failure should mention page_size_default")
        })();

        clear_vars(&["PLATEY_BOT_TOKEN", "PLATEY_PAGE_SIZE"]);
        result
    }

    #[test]
    fn unknown_default_category_fails_validation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PLATEY_BOT_TOKEN", "42:token");
        env::set_var("PLATEY_DEFAULT_CATEGORY", "boats");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("platey.toml");
            fs::write(&path, CATALOG_TOML).map_err(|err| err.to_string())?;

            let error = match AppConfig::load(LoadOptions {
                config_path: Some(path),
                ..LoadOptions::default()
            }) {
                Ok(_) => return Err("unknown default category should fail validation".to_string()),
                Err(error) => error,
            };
            let named = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("boats")
            );
            ensure(named, "validation failure should name the unknown category")
        })();

        clear_vars(&["PLATEY_BOT_TOKEN", "PLATEY_DEFAULT_CATEGORY"]);
        result
    }

    #[test]
    fn secret_token_is_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("PLATEY_BOT_TOKEN", "42:very-secret-value");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("platey.toml");
            fs::write(&path, CATALOG_TOML).map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(
                !debug.contains("very-secret-value"),
                "debug output should not contain the bot token",
            )?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )?;
            Ok(())
        })();

        clear_vars(&["PLATEY_BOT_TOKEN"]);
        result
    }

    #[test]
    fn missing_required_file_is_reported() {
        let error = AppConfig::load(LoadOptions {
            config_path: Some("does/not/exist/platey.toml".into()),
            require_file: true,
            ..LoadOptions::default()
        })
        .expect_err("missing required file should fail");

        assert!(matches!(error, ConfigError::MissingConfigFile(_)));
    }
}
