use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub draw: DrawConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Used to build shareable links, e.g. `https://wichteln.example.com`
    #[serde(default)]
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Upper bound on shuffle attempts before a draw gives up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_max_attempts() -> u32 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Buffered change events per collection before slow subscribers lag
    #[serde(default = "default_notify_capacity")]
    pub capacity: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            capacity: default_notify_capacity(),
        }
    }
}

fn default_notify_capacity() -> usize {
    256
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let file = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Some(config_str),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "cannot read config file {config_path}: {e}"
                )));
            }
        };
        Self::load(file.as_deref(), &config_path, |name| env::var(name).ok())
    }

    /// Build the config from an optional TOML file plus environment values.
    /// Environment values win over the file; one that does not parse is a
    /// `ConfigError`, never silently replaced by a default.
    pub fn load(
        file: Option<&str>,
        config_path: &str,
        get_env: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let mut config = match file {
            Some(config_str) => Self::from_toml_str(config_str)?,
            None => {
                // Without a config file the database URL must come from the environment
                let database_url = get_env("DATABASE_URL").ok_or_else(|| {
                    AppError::ConfigError(format!(
                        "DATABASE_URL is not set and {config_path} was not found"
                    ))
                })?;

                Config {
                    server: ServerConfig {
                        host: "0.0.0.0".to_string(),
                        port: 8080,
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: 10,
                    },
                    draw: DrawConfig::default(),
                    notify: NotifyConfig::default(),
                    public_base_url: None,
                }
            }
        };

        if let Some(v) = get_env("SERVER_HOST") {
            config.server.host = v;
        }
        if let Some(p) = env_parse(&get_env, "SERVER_PORT")? {
            config.server.port = p;
        }
        if let Some(v) = get_env("DATABASE_URL") {
            config.database.url = v;
        }
        if let Some(mc) = env_parse(&get_env, "DB_MAX_CONNECTIONS")? {
            config.database.max_connections = mc;
        }
        if let Some(n) = env_parse(&get_env, "DRAW_MAX_ATTEMPTS")? {
            config.draw.max_attempts = n;
        }
        if let Some(n) = env_parse(&get_env, "NOTIFY_CAPACITY")? {
            config.notify.capacity = n;
        }
        if let Some(v) = get_env("PUBLIC_BASE_URL") {
            config.public_base_url = Some(v);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> AppResult<Self> {
        toml::from_str(s).map_err(|e| AppError::ConfigError(format!("invalid config file: {e}")))
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.draw.max_attempts == 0 {
            return Err(AppError::ConfigError(
                "draw.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.notify.capacity == 0 {
            return Err(AppError::ConfigError(
                "notify.capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(
    get_env: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> AppResult<Option<T>> {
    let Some(value) = get_env(name) else {
        return Ok(None);
    };
    value.trim().parse().map(Some).map_err(|_| {
        AppError::ConfigError(format!("{name} has an invalid value: {value:?}"))
    })
}
