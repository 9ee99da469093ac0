//! Replays recorded chess games and encodes each final position as a
//! 773-wide bitboard feature vector, persisted as `.npy` arrays.

pub mod chess;

pub use chess::{
    BatchReport, Compression, Config, Dataset, Error, FEATURE_LEN, FailurePolicy, FeatureVector,
    FileOutcome, GameRecord, Job, JobReport, MoveOutcome, Replay, ReplayStats, Result,
    SplitOptions, SplitReport, apply_san, encode, process_file, replay, run_batch, save_dataset,
    split_pgn,
};
