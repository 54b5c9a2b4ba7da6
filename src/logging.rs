use crate::config::Config;
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Sends tracing output to the log file under the data directory. The
/// terminal belongs to the UI, so nothing is written to stdout or stderr.
pub fn init(config: &Config) -> io::Result<()> {
    let filter = level_filter(&config.log_level)?;
    fs::create_dir_all(&config.data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Parses `log_level` as an env-filter directive list.
fn level_filter(level: &str) -> io::Result<EnvFilter> {
    EnvFilter::try_new(level).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid log_level '{level}': {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn accepts_levels_and_directives() {
        assert!(level_filter("debug").is_ok());
        assert!(level_filter("mood_journal=trace,info").is_ok());
    }

    #[test]
    fn bad_log_level_is_reported_before_touching_the_disk() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: dir.path().join("data"),
            log_level: "mood_journal=loud".to_string(),
            ..Config::default()
        };

        let err = init(&config).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("mood_journal=loud"));
        assert!(!config.data_dir.exists());
    }
}
