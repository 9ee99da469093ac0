use super::encoder::encode;
use super::error::{Error, Result};
use super::replay::{ReplayStats, replay};
use super::types::{Dataset, MOVES_COLUMN};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use zstd::stream::read::Decoder as ZstdDecoder;

pub type Input = Box<dyn Read + Send>;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// zstd for `.zst`/`.zstd` files, plain otherwise.
    #[default]
    Auto,
    Plain,
    Zstd,
}

impl Compression {
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim();
        if normalized.eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else if normalized.eq_ignore_ascii_case("plain") || normalized.eq_ignore_ascii_case("none")
        {
            Ok(Self::Plain)
        } else if normalized.eq_ignore_ascii_case("zstd") {
            Ok(Self::Zstd)
        } else {
            Err(Error::Config(format!(
                "Invalid compression value '{}'. Supported values: 'auto', 'plain' or 'zstd'.",
                normalized
            )))
        }
    }

    fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => match path.extension().and_then(|ext| ext.to_str()) {
                Some("zst" | "zstd") => Self::Zstd,
                _ => Self::Plain,
            },
            other => other,
        }
    }
}

impl FromStr for Compression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

pub fn open_input(path: &Path, compression: Compression) -> Result<Input> {
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    match compression.resolve(path) {
        Compression::Zstd => ZstdDecoder::new(file)
            .map(|decoder| Box::new(decoder) as Input)
            .map_err(|source| Error::Open {
                path: path.to_path_buf(),
                source,
            }),
        _ => Ok(Box::new(file)),
    }
}

/// Everything produced from one input file.
#[derive(Debug, Default)]
pub struct FileOutcome {
    pub dataset: Dataset,
    pub stats: ReplayStats,
}

/// Replay and encode every row of a CSV game file.
///
/// Fails only when the file cannot be opened or is not valid CSV; illegal
/// moves are counted in the returned stats.
pub fn process_file(path: &Path, compression: Compression) -> Result<FileOutcome> {
    let input = open_input(path, compression)?;
    let outcome = process_reader(input).map_err(|source| Error::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "File read successfully: {} ({} games)",
        path.display(),
        outcome.dataset.len()
    );
    Ok(outcome)
}

/// Rows shorter than the header, or a file without a `Moves` column, replay as
/// an empty game.
pub fn process_reader<R: Read>(input: R) -> std::result::Result<FileOutcome, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let moves_idx = reader
        .headers()?
        .iter()
        .position(|name| name == MOVES_COLUMN);
    let mut outcome = FileOutcome::default();
    let mut record = csv::StringRecord::new();

    while reader.read_record(&mut record)? {
        let movetext = moves_idx.and_then(|idx| record.get(idx)).unwrap_or("");
        let replay = replay(movetext);
        outcome.stats += replay.stats;
        outcome.dataset.push(encode(&replay.position));
    }

    Ok(outcome)
}
