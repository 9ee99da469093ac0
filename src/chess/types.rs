use serde::{Deserialize, Serialize};

use super::encoder::FeatureVector;

/// Feature vectors of one source file, in row order.
pub type Dataset = Vec<FeatureVector>;

/// One game row of the split CSV files (Lichess dump column names).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(rename = "White")]
    pub white: String,
    #[serde(rename = "Black")]
    pub black: String,
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "WhiteElo")]
    pub white_elo: String,
    #[serde(rename = "BlackElo")]
    pub black_elo: String,
    #[serde(rename = "TimeControl")]
    pub time_control: String,
    #[serde(rename = "Termination")]
    pub termination: String,
    #[serde(rename = "Moves")]
    pub moves: String,
}

impl GameRecord {
    pub const HEADER: [&'static str; 8] = [
        "White",
        "Black",
        "Result",
        "WhiteElo",
        "BlackElo",
        "TimeControl",
        "Termination",
        "Moves",
    ];
}

/// The only column the encoder reads.
pub(crate) const MOVES_COLUMN: &str = "Moves";
