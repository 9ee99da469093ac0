use super::config::{Config, FailurePolicy, Job};
use super::error::{Error, Result};
use super::reader::{FileOutcome, process_file};
use super::replay::ReplayStats;
use super::writer::{ensure_directory, save_dataset};
use log::{error, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub stats: ReplayStats,
    pub written: bool,
    pub errors: Vec<String>,
}

impl JobReport {
    fn new(job: &Job) -> Self {
        Self {
            input: job.input.clone(),
            output: job.output.clone(),
            rows: 0,
            stats: ReplayStats::default(),
            written: false,
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub jobs: Vec<JobReport>,
    pub stats: ReplayStats,
    pub failure_ratio: Option<f64>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        self.jobs.iter().any(|job| !job.errors.is_empty())
    }

    pub fn log_summary(&self) {
        info!("Number of successful moves: {}", self.stats.successful);
        info!("Number of illegal moves: {}", self.stats.failed);
        info!("Total number of moves: {}", self.stats.successful);
        if let Some(ratio) = self.failure_ratio {
            info!("Proportion of illegal moves: {:.2}%", ratio * 100.0);
        }
        for job in &self.jobs {
            for err in &job.errors {
                warn!("{}: {}", job.input.display(), err);
            }
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            ensure_directory(dir)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("cannot serialize report: {e}")))?;
        fs::write(path, json).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Process every job in a bounded worker pool, then persist the datasets.
///
/// Only configuration and pool setup errors are returned; per-file failures
/// are logged and recorded in the report according to `config.policy`.
pub fn run_batch(config: &Config) -> Result<BatchReport> {
    config.validate()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()?;

    let results: Vec<Result<FileOutcome>> = pool.install(|| {
        config
            .jobs
            .par_iter()
            .map(|job| process_file(&job.input, config.compression))
            .collect()
    });

    let any_input_failed = results.iter().any(Result::is_err);
    let write_outputs = match config.policy {
        FailurePolicy::Continue => true,
        FailurePolicy::Abort => !any_input_failed,
    };
    if !write_outputs {
        warn!("Input failures with policy 'abort'; no datasets will be written");
    }

    let jobs: Vec<JobReport> = config
        .jobs
        .iter()
        .zip(results)
        .map(|(job, result)| finish_job(job, result, write_outputs))
        .collect();

    let stats: ReplayStats = jobs.iter().map(|job| job.stats).sum();
    Ok(BatchReport {
        jobs,
        stats,
        failure_ratio: stats.failure_ratio(),
    })
}

fn finish_job(job: &Job, result: Result<FileOutcome>, write_output: bool) -> JobReport {
    let mut report = JobReport::new(job);

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("Failed to process file {}: {}", job.input.display(), err);
            report.errors.push(err.to_string());
            FileOutcome::default()
        }
    };
    report.rows = outcome.dataset.len();
    report.stats = outcome.stats;

    if !write_output {
        return report;
    }

    match save_dataset(&job.output, &outcome.dataset) {
        Ok(()) => report.written = true,
        Err(err) => {
            error!("Error saving data to {}: {}", job.output.display(), err);
            report.errors.push(err.to_string());
        }
    }
    report
}
