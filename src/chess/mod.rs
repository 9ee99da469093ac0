pub mod batch;
pub mod config;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod log;
pub mod reader;
pub mod replay;
pub mod split;
pub mod types;
pub mod visitor;
pub mod writer;

pub use batch::{BatchReport, JobReport, run_batch};
pub use config::{Config, FailurePolicy, Job};
pub use encoder::{FEATURE_LEN, FeatureVector, encode};
pub use error::{Error, Result};
pub use reader::{Compression, FileOutcome, process_file};
pub use replay::{MoveOutcome, Replay, ReplayStats, apply_san, replay};
pub use split::{SplitOptions, SplitReport, split_pgn};
pub use types::{Dataset, GameRecord};
pub use writer::save_dataset;
