use super::error::{Error, Result};
use super::reader::Compression;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_WORKERS: usize = 2;

/// One input CSV file and the `.npy` file its dataset is written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Job {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Parses `INPUT=OUTPUT`.
impl FromStr for Job {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((input, output)) if !input.trim().is_empty() && !output.trim().is_empty() => {
                Ok(Self::new(input.trim(), output.trim()))
            }
            _ => Err(Error::Config(format!(
                "Invalid job '{s}'. Expected INPUT=OUTPUT."
            ))),
        }
    }
}

/// What to do when an input file cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure, write an empty dataset for that input, keep going.
    #[default]
    Continue,
    /// Log the failure and write no output at all.
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            other => Err(Error::Config(format!(
                "Invalid policy '{other}'. Supported values: 'continue' or 'abort'."
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub jobs: Vec<Job>,
    pub workers: usize,
    pub policy: FailurePolicy,
    pub compression: Compression,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jobs: vec![
                Job::new(
                    "dataset/CSV_Files/1GB_white_wins.csv",
                    "dataset/NPY_Files/white.npy",
                ),
                Job::new(
                    "dataset/CSV_Files/1GB_black_wins.csv",
                    "dataset/NPY_Files/black.npy",
                ),
            ],
            workers: DEFAULT_WORKERS,
            policy: FailurePolicy::default(),
            compression: Compression::default(),
        }
    }
}

impl Config {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("workers must be at least 1".to_string()));
        }
        if self.jobs.is_empty() {
            return Err(Error::Config("no jobs configured".to_string()));
        }

        let mut outputs = HashSet::new();
        for job in &self.jobs {
            if !outputs.insert(&job.output) {
                return Err(Error::Config(format!(
                    "output '{}' is used by more than one job",
                    job.output.display()
                )));
            }
        }
        Ok(())
    }
}
