use crate::journal_store::PersistPolicy;
use crate::mood_trend::{Averaging, TrendWindow};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DATA_DIR_ENV: &str = "MOOD_JOURNAL_DATA_DIR";
pub const LOG_ENV: &str = "MOOD_JOURNAL_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mood-journal")
}

fn default_write_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    50
}

fn default_quote_interval_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub trend_window: TrendWindow,
    pub averaging: Averaging,
    pub write_retries: u32,
    pub retry_backoff_ms: u64,
    pub quote_interval_secs: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: default_data_dir(),
            trend_window: TrendWindow::default(),
            averaging: Averaging::default(),
            write_retries: default_write_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            quote_interval_secs: default_quote_interval_secs(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// `~/.config/mood-journal/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mood-journal").join("config.toml"))
    }

    /// Loads the config file if there is one, then applies environment
    /// overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) => Self::from_file(&path)?,
            None => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Missing or empty files give the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        toml::from_str(content)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                self.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(level) = env::var(LOG_ENV) {
            if !level.is_empty() {
                self.log_level = level;
            }
        }
    }

    pub fn persist_policy(&self) -> PersistPolicy {
        PersistPolicy {
            retries: self.write_retries,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }

    pub fn quote_interval(&self) -> Duration {
        Duration::from_secs(self.quote_interval_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("mood-journal.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.trend_window.days(), 7);
        assert_eq!(config.averaging, Averaging::Pairwise);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
trend_window = 30
averaging = "mean"
data_dir = "/tmp/journal"
"#,
        )
        .unwrap();
        assert_eq!(config.trend_window, TrendWindow::Month);
        assert_eq!(config.averaging, Averaging::Mean);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/journal"));
        assert_eq!(config.write_retries, 2);
        assert_eq!(config.persist_policy().backoff, Duration::from_millis(50));
    }

    #[test]
    fn unsupported_window_is_an_error() {
        assert!(Config::from_toml("trend_window = 10").is_err());
    }

    #[test]
    fn file_loading_reports_parse_errors() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "averaging = \"median\"").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.quote_interval(), Duration::from_secs(10));
        assert!(config.log_path().ends_with("mood-journal.log"));
    }
}
