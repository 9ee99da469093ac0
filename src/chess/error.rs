use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to open file '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Failed to parse CSV '{}': {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Failed to create directory '{}': {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to read PGN '{}': {source}", path.display())]
    Pgn { path: PathBuf, source: io::Error },

    #[error("Invalid path pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Path of the file the error refers to, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Open { path, .. }
            | Self::Csv { path, .. }
            | Self::CreateDir { path, .. }
            | Self::Write { path, .. }
            | Self::Pgn { path, .. } => Some(path),
            Self::Pattern { .. } | Self::Config(_) | Self::ThreadPool(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_message_names_path() {
        let err = Error::Open {
            path: PathBuf::from("games/white.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to open file 'games/white.csv': missing"
        );
        assert_eq!(err.path(), Some(&PathBuf::from("games/white.csv")));
    }

    #[test]
    fn test_config_error_has_no_path() {
        let err = Error::Config("workers must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: workers must be at least 1"
        );
        assert!(err.path().is_none());
    }
}
