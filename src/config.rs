use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::errors::StartupError;
use crate::state::leaderboard::{DEFAULT_CAPACITY, MAX_CAPACITY};

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "LEADERBOARD_CONFIG";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Interface to bind, e.g. "0.0.0.0".
    pub host: String,

    /// HTTP port to listen on.
    pub port: u16,

    /// Log level for tracing (e.g. "info", "debug"). `RUST_LOG` wins when set.
    pub log_level: String,

    pub server_version: String,

    /// Directory served for any path the API does not handle.
    pub static_dir: String,

    /// How many ranked entries the leaderboard keeps.
    pub leaderboard_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            static_dir: "./web".to_string(),
            leaderboard_size: DEFAULT_CAPACITY,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, StartupError> {
        let file = fs::read_to_string(path).map_err(|source| StartupError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&file, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, StartupError> {
        let cfg: AppConfig =
            serde_json::from_str(text).map_err(|source| StartupError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), StartupError> {
        if self.leaderboard_size == 0 {
            return Err(StartupError::InvalidConfig(
                "leaderboard_size must be at least 1".to_string(),
            ));
        }
        if self.leaderboard_size > MAX_CAPACITY {
            return Err(StartupError::InvalidConfig(format!(
                "leaderboard_size must be at most {MAX_CAPACITY}, got {}",
                self.leaderboard_size
            )));
        }
        Ok(())
    }

    /// `host:port` string handed to the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Find config.json: `$LEADERBOARD_CONFIG`, then the executable's folder,
/// then its parent. `None` means run on defaults.
pub fn locate_config() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }

    let exe_path = env::current_exe().ok()?;
    let exe_dir = exe_path.parent()?;

    [exe_dir.join("config.json"), exe_dir.join("..").join("config.json")]
        .into_iter()
        .find(|candidate| candidate.exists())
}
