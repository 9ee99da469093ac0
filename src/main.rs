use anyhow::{Context, Result};
use chess_bitboards::chess::log as chess_log;
use chess_bitboards::chess::split::{DEFAULT_MIN_ELO, DEFAULT_MIN_MOVES};
use chess_bitboards::{Compression, Config, FailurePolicy, Job, SplitOptions, run_batch, split_pgn};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "chess-bitboards")]
#[command(about = "Encode recorded chess games as bitboard feature arrays", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay CSV game files and write one .npy dataset per file
    Encode(EncodeArgs),
    /// Split a PGN dump into white-wins and black-wins CSV files
    Split(SplitArgs),
}

#[derive(Args)]
struct EncodeArgs {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// INPUT=OUTPUT pair, repeatable; replaces the configured jobs
    #[arg(short, long = "job", value_name = "INPUT=OUTPUT")]
    jobs: Vec<Job>,

    /// Worker threads
    #[arg(short, long)]
    workers: Option<usize>,

    /// continue | abort
    #[arg(long)]
    policy: Option<FailurePolicy>,

    /// auto | plain | zstd
    #[arg(long)]
    compression: Option<Compression>,

    /// Write the batch report as JSON
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Args)]
struct SplitArgs {
    /// PGN file or glob pattern
    input: String,

    #[arg(long, default_value = "dataset/CSV_Files/1GB_white_wins.csv")]
    white: PathBuf,

    #[arg(long, default_value = "dataset/CSV_Files/1GB_black_wins.csv")]
    black: PathBuf,

    #[arg(long, default_value_t = DEFAULT_MIN_ELO)]
    min_elo: u32,

    /// Minimum number of full moves
    #[arg(long, default_value_t = DEFAULT_MIN_MOVES)]
    min_moves: u32,

    /// auto | plain | zstd
    #[arg(long, default_value = "auto")]
    compression: Compression,
}

fn main() -> Result<ExitCode> {
    chess_log::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Encode(args) => encode(args),
        Command::Split(args) => split(args),
    }
}

fn load_config(args: &EncodeArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    if !args.jobs.is_empty() {
        config.jobs = args.jobs.clone();
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(policy) = args.policy {
        config.policy = policy;
    }
    if let Some(compression) = args.compression {
        config.compression = compression;
    }
    Ok(config)
}

fn encode(args: EncodeArgs) -> Result<ExitCode> {
    let config = load_config(&args)?;
    let report = run_batch(&config).context("batch run failed")?;
    report.log_summary();

    if let Some(path) = &args.summary {
        report
            .write_json(path)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
    }

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn split(args: SplitArgs) -> Result<ExitCode> {
    let options = SplitOptions {
        input: args.input,
        white: args.white,
        black: args.black,
        min_elo: args.min_elo,
        min_moves: args.min_moves,
        compression: args.compression,
    };
    let report = split_pgn(&options).context("PGN split failed")?;
    report.log_summary();

    Ok(if report.parse_errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
