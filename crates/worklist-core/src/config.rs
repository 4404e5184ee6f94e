use crate::sort::MissingDays;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            api_secret: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorklistConfig {
    #[serde(default = "default_true")]
    pub hide_overdue: bool,
    #[serde(default)]
    pub missing_days: MissingDays,
}

impl Default for WorklistConfig {
    fn default() -> Self {
        Self {
            hide_overdue: default_true(),
            missing_days: MissingDays::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub worklist: WorklistConfig,
}

/// Connection settings with every override applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub user: UserConfig,
    pub resolved_output: String,
}

impl EffectiveConfig {
    /// Server settings after `WL_URL` / `WL_API_KEY` / `WL_API_SECRET`.
    ///
    /// # Errors
    ///
    /// Fails when no server URL is configured anywhere.
    pub fn connection(&self) -> Result<Connection> {
        connection_from(&self.user.server, |name| env::var(name).ok())
    }
}

/// `{config_dir}/worklist/config.toml`, when a config dir exists.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("worklist/config.toml"))
}

pub fn load_user_config() -> Result<UserConfig> {
    match user_config_path() {
        Some(path) => load_user_config_from(&path),
        None => Ok(UserConfig::default()),
    }
}

pub fn load_user_config_from(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn resolve_config(cli_json: bool, cli_format: Option<&str>) -> Result<EffectiveConfig> {
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(
        cli_json,
        cli_format.map(String::from),
        user.output.clone(),
        env_format,
    )?;

    Ok(EffectiveConfig {
        user,
        resolved_output,
    })
}

fn connection_from(
    server: &ServerConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Connection> {
    let pick = |name: &str, fallback: Option<&String>| {
        lookup(name)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| fallback.cloned())
    };
    let Some(url) = pick("WL_URL", server.url.as_ref()) else {
        bail!("no server URL configured (set WL_URL or [server].url)");
    };
    Ok(Connection {
        url: url.trim_end_matches('/').to_string(),
        api_key: pick("WL_API_KEY", server.api_key.as_ref()),
        api_secret: pick("WL_API_SECRET", server.api_secret.as_ref()),
        timeout_secs: server.timeout_secs,
    })
}

fn resolve_output(
    cli_json: bool,
    cli_format: Option<String>,
    user_output: Option<String>,
    env_format: Option<String>,
) -> Result<String> {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some("pretty"),
            "text" | "table" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if cli_json {
        return Ok("json".to_string());
    }

    if let Some(raw) = cli_format.as_deref() {
        return match normalize_output_mode(raw) {
            Some(mode) => Ok(mode.to_string()),
            None => bail!("unknown output format '{raw}' (expected pretty, text or json)"),
        };
    }

    if let Some(mode) = env_format.as_deref().and_then(normalize_output_mode) {
        return Ok(mode.to_string());
    }

    if let Some(mode) = user_output.as_deref().and_then(normalize_output_mode) {
        return Ok(mode.to_string());
    }

    if std::io::stdout().is_terminal() {
        Ok("pretty".to_string())
    } else {
        Ok("text".to_string())
    }
}

const fn default_true() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    30
}
