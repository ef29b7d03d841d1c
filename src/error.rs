use std::io;

use thiserror::Error;

/// Error type for running the quiz application.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("could not determine a data directory; pass --data-dir")]
    NoDataDir,
    #[error("failed to set up logging: {0}")]
    Logging(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
