//! Runtime settings assembled from the command line.

use std::path::PathBuf;

use crate::data::DEFAULT_ENDPOINT;
use crate::error::QuizError;

const APP_DIR: &str = "trivia-quiz";
const LOG_FILE: &str = "trivia-quiz.log";

pub const LOG_ENV: &str = "TRIVIA_QUIZ_LOG";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Holds saved state and the log file.
    pub data_dir: PathBuf,
    pub endpoint: String,
    pub log_level: String,
    /// Keep state in memory only; nothing survives a restart.
    pub ephemeral: bool,
}

impl Config {
    /// Fills unset values with defaults. Fails only when no data directory can be found.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        endpoint: Option<String>,
        log_level: Option<String>,
        ephemeral: bool,
    ) -> Result<Self, QuizError> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir().ok_or(QuizError::NoDataDir)?,
        };

        Ok(Self {
            data_dir,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            log_level: log_level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            ephemeral,
        })
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fills_defaults() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/quiz")), None, None, false).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.log_file(), PathBuf::from("/tmp/quiz/trivia-quiz.log"));
    }

    #[test]
    fn test_resolve_keeps_overrides() {
        let config = Config::resolve(
            Some(PathBuf::from("data")),
            Some("http://localhost:9000/api.php".to_string()),
            Some("debug".to_string()),
            true,
        )
        .unwrap();
        assert_eq!(config.endpoint, "http://localhost:9000/api.php");
        assert_eq!(config.log_level, "debug");
        assert!(config.ephemeral);
    }
}
