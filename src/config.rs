//! Runtime configuration
//!
//! Each setting is taken from the command line first, then the environment,
//! then a default. The data directory is resolved once here and handed to the
//! stores explicitly.

use std::path::PathBuf;

use crate::constants::{DATA_DIR_NAME, DEFAULT_CLIENT, ENV_CLIENT, ENV_HOME, LOG_FILE};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directory holding endpoints, preferences and the log
    pub data_dir: PathBuf,
    /// HTTP client executable, looked up on PATH unless it is a path
    pub client_binary: String,
}

impl Config {
    pub fn resolve(data_dir: Option<PathBuf>, client: Option<String>) -> Self {
        Self::resolve_with(data_dir, client, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        data_dir: Option<PathBuf>,
        client: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let data_dir = data_dir
            .or_else(|| env(ENV_HOME).map(PathBuf::from))
            .unwrap_or_else(default_data_dir);
        let client_binary = client
            .or_else(|| env(ENV_CLIENT))
            .unwrap_or_else(|| DEFAULT_CLIENT.to_string());

        Config {
            data_dir,
            client_binary,
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: default_data_dir(),
            client_binary: DEFAULT_CLIENT.to_string(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}
