use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "sheetpost";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_RANGE: &str = "A:Z";
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_API_KEY_ENV: &str = "SHEETPOST_SHEETS_API_KEY";
pub const MAX_SMTP_TIMEOUT_SECONDS: u64 = 600;

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub smtp: Option<SmtpConfig>,
    pub templates: TemplatesConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub provider: SourceProvider,
    pub sheet: Option<String>,
    pub range: String,
    pub api_key_env: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceProvider {
    Csv,
    GoogleSheets,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub from: String,
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password_env: Option<String>,
    pub tls: SmtpTls,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    Tls,
    StartTls,
    None,
}

#[derive(Debug, Clone, Default)]
pub struct TemplatesConfig {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            provider: SourceProvider::Csv,
            sheet: None,
            range: DEFAULT_RANGE.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidField {
        field,
        reason: reason.into(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    source: Option<SourceFile>,
    smtp: Option<SmtpFile>,
    templates: Option<TemplatesFile>,
    server: Option<ServerFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceFile {
    provider: Option<SourceProvider>,
    sheet: Option<String>,
    range: Option<String>,
    api_key_env: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SmtpFile {
    from: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password_env: Option<String>,
    tls: Option<SmtpTls>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplatesFile {
    dir: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    bind: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(source) = parsed.source {
        merge_source(&mut config.source, source)?;
    }

    if let Some(smtp) = parsed.smtp {
        config.smtp = Some(parse_smtp(smtp)?);
    }

    if let Some(templates) = parsed.templates {
        if let Some(dir) = templates.dir {
            config.templates.dir = Some(expand_home(non_blank("templates.dir", dir)?)?);
        }
    }

    if let Some(server) = parsed.server {
        if let Some(bind) = server.bind {
            config.server.bind = bind
                .trim()
                .parse()
                .map_err(|_| invalid("server.bind", format!("expected host:port, got {bind:?}")))?;
        }
    }

    Ok(config)
}

fn merge_source(config: &mut SourceConfig, source: SourceFile) -> Result<()> {
    if let Some(provider) = source.provider {
        config.provider = provider;
    }
    if let Some(sheet) = source.sheet {
        config.sheet = Some(non_blank("source.sheet", sheet)?);
    }
    if let Some(range) = source.range {
        config.range = non_blank("source.range", range)?;
    }
    if let Some(api_key_env) = source.api_key_env {
        config.api_key_env = non_blank("source.api_key_env", api_key_env)?;
    }
    if let Some(base_url) = source.base_url {
        let base_url = non_blank("source.base_url", base_url)?;
        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(invalid("source.base_url", "must be an http(s) url"));
        }
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    Ok(())
}

fn parse_smtp(smtp: SmtpFile) -> Result<SmtpConfig> {
    let from = non_blank(
        "smtp.from",
        smtp.from.ok_or_else(|| invalid("smtp.from", "is required"))?,
    )?;
    from.parse::<lettre::message::Mailbox>()
        .map_err(|_| invalid("smtp.from", "must be a valid email address"))?;
    let host = non_blank(
        "smtp.host",
        smtp.host.ok_or_else(|| invalid("smtp.host", "is required"))?,
    )?;

    if let Some(seconds) = smtp.timeout_seconds {
        if seconds == 0 || seconds > MAX_SMTP_TIMEOUT_SECONDS {
            return Err(invalid(
                "smtp.timeout_seconds",
                format!("must be between 1 and {MAX_SMTP_TIMEOUT_SECONDS}"),
            ));
        }
    }

    let username = smtp
        .username
        .map(|value| non_blank("smtp.username", value))
        .transpose()?;
    let password_env = smtp
        .password_env
        .map(|value| non_blank("smtp.password_env", value))
        .transpose()?;
    if username.is_some() != password_env.is_some() {
        return Err(invalid(
            "smtp.username",
            "username and password_env must be set together",
        ));
    }

    Ok(SmtpConfig {
        from,
        host,
        port: smtp.port,
        username,
        password_env,
        tls: smtp.tls.unwrap_or(SmtpTls::StartTls),
        timeout_seconds: smtp.timeout_seconds,
    })
}

fn non_blank(field: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(field, "cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn expand_home(raw: String) -> Result<PathBuf> {
    match raw.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(raw)),
    }
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
