use super::error::{Error, Result};
use super::reader::{Compression, open_input};
use super::types::GameRecord;
use super::visitor::{PgnGame, SplitVisitor};
use super::writer::ensure_directory;
use log::{info, warn};
use pgn_reader::Reader;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const DEFAULT_MIN_ELO: u32 = 1700;
pub const DEFAULT_MIN_MOVES: u32 = 20;

#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// A single PGN path or a glob pattern.
    pub input: String,
    pub white: PathBuf,
    pub black: PathBuf,
    pub min_elo: u32,
    pub min_moves: u32,
    pub compression: Compression,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            input: "dataset/PGN_Files/lichess_db_1GB.pgn".to_string(),
            white: PathBuf::from("dataset/CSV_Files/1GB_white_wins.csv"),
            black: PathBuf::from("dataset/CSV_Files/1GB_black_wins.csv"),
            min_elo: DEFAULT_MIN_ELO,
            min_moves: DEFAULT_MIN_MOVES,
            compression: Compression::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Eval,
    Rating,
    Result,
    Length,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    pub files: usize,
    pub games: u64,
    pub white: u64,
    pub black: u64,
    pub skipped_eval: u64,
    pub skipped_rating: u64,
    pub skipped_result: u64,
    pub skipped_length: u64,
    pub parse_errors: u64,
}

impl SplitReport {
    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Eval => self.skipped_eval += 1,
            SkipReason::Rating => self.skipped_rating += 1,
            SkipReason::Result => self.skipped_result += 1,
            SkipReason::Length => self.skipped_length += 1,
        }
    }

    pub fn log_summary(&self) {
        info!(
            "Read {} games from {} file(s): {} white wins, {} black wins",
            self.games, self.files, self.white, self.black
        );
        info!(
            "Skipped: {} evaluated, {} below rating, {} not decisive, {} too short, {} parse errors",
            self.skipped_eval,
            self.skipped_rating,
            self.skipped_result,
            self.skipped_length,
            self.parse_errors
        );
    }
}

fn parse_elo(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

/// Decide which file a game belongs to.
pub fn classify_game(game: &PgnGame, min_elo: u32, min_moves: u32) -> Result<Winner, SkipReason> {
    if game.has_eval {
        return Err(SkipReason::Eval);
    }
    if parse_elo(&game.record.white_elo) < min_elo || parse_elo(&game.record.black_elo) < min_elo
    {
        return Err(SkipReason::Rating);
    }
    let winner = match game.record.result.as_str() {
        "1-0" => Winner::White,
        "0-1" => Winner::Black,
        _ => return Err(SkipReason::Result),
    };
    if game.full_moves() < min_moves {
        return Err(SkipReason::Length);
    }
    Ok(winner)
}

/// Expand a glob pattern; anything without `*` or `?` is taken literally.
pub fn expand_inputs(pattern: &str) -> Result<Vec<PathBuf>> {
    if pattern.contains('*') || pattern.contains('?') {
        let paths = glob::glob(pattern)
            .map_err(|source| Error::Pattern {
                pattern: pattern.to_string(),
                source,
            })?
            .filter_map(|entry| entry.ok())
            .collect();
        Ok(paths)
    } else {
        Ok(vec![PathBuf::from(pattern)])
    }
}

struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvSink {
    fn create(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            ensure_directory(dir)?;
        }
        let csv_error = |source| Error::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(csv_error)?;
        writer.write_record(GameRecord::HEADER).map_err(csv_error)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    fn write(&mut self, record: &GameRecord) -> Result<()> {
        self.writer.serialize(record).map_err(|source| Error::Csv {
            path: self.path.clone(),
            source,
        })
    }

    fn finish(mut self) -> Result<()> {
        self.writer.flush().map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Split a PGN dump into white-wins and black-wins CSV files.
pub fn split_pgn(options: &SplitOptions) -> Result<SplitReport> {
    let paths = expand_inputs(&options.input)?;
    let mut white = CsvSink::create(&options.white)?;
    let mut black = CsvSink::create(&options.black)?;
    let mut report = SplitReport::default();

    for path in &paths {
        let input = match open_input(path, options.compression) {
            Ok(input) => input,
            Err(err) if paths.len() == 1 => return Err(err),
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };
        report.files += 1;

        let mut reader = Reader::new(input);
        let mut visitor = SplitVisitor;
        loop {
            let game = match reader.read_game(&mut visitor) {
                Ok(Some(game)) => game,
                Ok(None) => break,
                Err(source) => {
                    let err = Error::Pgn {
                        path: path.clone(),
                        source,
                    };
                    warn!("{err} (after {} games)", report.games);
                    report.parse_errors += 1;
                    break;
                }
            };
            report.games += 1;

            match classify_game(&game, options.min_elo, options.min_moves) {
                Ok(Winner::White) => {
                    white.write(&game.record)?;
                    report.white += 1;
                }
                Ok(Winner::Black) => {
                    black.write(&game.record)?;
                    report.black += 1;
                }
                Err(reason) => report.record_skip(reason),
            }
        }
    }

    white.finish()?;
    black.finish()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const LONG_MOVES: &str = "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6 5. O-O Be7 6. Re1 b5 \
        7. Bb3 d6 8. c3 O-O 9. h3 Nb8 10. d4 Nbd7 11. c4 c6 12. cxb5 axb5 13. Nc3 Bb7 \
        14. Bg5 b4 15. Nb1 h6 16. Bh4 c5 17. dxe5 Nxe4 18. Bxe7 Qxe7 19. exd6 Qf6 \
        20. Nbd2 Nxd6";

    fn game(white_elo: &str, black_elo: &str, result: &str, moves: &str) -> String {
        format!(
            "[Event \"Rated Blitz game\"]\n[White \"w\"]\n[Black \"b\"]\n[Result \"{result}\"]\n\
             [WhiteElo \"{white_elo}\"]\n[BlackElo \"{black_elo}\"]\n[TimeControl \"300+0\"]\n\
             [Termination \"Normal\"]\n\n{moves} {result}\n\n"
        )
    }

    fn pgn_game(white_elo: &str, black_elo: &str, result: &str, plies: u32) -> PgnGame {
        PgnGame {
            record: GameRecord {
                result: result.to_string(),
                white_elo: white_elo.to_string(),
                black_elo: black_elo.to_string(),
                ..GameRecord::default()
            },
            plies,
            has_eval: false,
        }
    }

    fn read_csv(path: &Path) -> Vec<GameRecord> {
        csv::Reader::from_path(path)
            .unwrap()
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_classify_game_routes_decisive_results() {
        assert_eq!(
            classify_game(&pgn_game("1800", "1800", "1-0", 40), 1700, 20),
            Ok(Winner::White)
        );
        assert_eq!(
            classify_game(&pgn_game("1800", "1800", "0-1", 41), 1700, 20),
            Ok(Winner::Black)
        );
    }

    #[test]
    fn test_classify_game_skip_reasons() {
        assert_eq!(
            classify_game(&pgn_game("1800", "1800", "1/2-1/2", 80), 1700, 20),
            Err(SkipReason::Result)
        );
        assert_eq!(
            classify_game(&pgn_game("1800", "1800", "*", 80), 1700, 20),
            Err(SkipReason::Result)
        );
        assert_eq!(
            classify_game(&pgn_game("1699", "1800", "1-0", 80), 1700, 20),
            Err(SkipReason::Rating)
        );
        assert_eq!(
            classify_game(&pgn_game("?", "1800", "1-0", 80), 1700, 20),
            Err(SkipReason::Rating)
        );
        assert_eq!(
            classify_game(&pgn_game("1800", "1800", "0-1", 39), 1700, 20),
            Err(SkipReason::Length)
        );

        let mut evaluated = pgn_game("1800", "1800", "1-0", 80);
        evaluated.has_eval = true;
        assert_eq!(classify_game(&evaluated, 1700, 20), Err(SkipReason::Eval));
    }

    #[test]
    fn test_expand_inputs_literal_path() {
        let paths = expand_inputs("games/one.pgn").unwrap();
        assert_eq!(paths, vec![PathBuf::from("games/one.pgn")]);
    }

    #[test]
    fn test_expand_inputs_glob() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.pgn"), "").unwrap();
        fs::write(dir.path().join("b.pgn"), "").unwrap();
        fs::write(dir.path().join("c.txt"), "").unwrap();

        let pattern = format!("{}/*.pgn", dir.path().display());
        let paths = expand_inputs(&pattern).unwrap();
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_expand_inputs_invalid_pattern() {
        let err = expand_inputs("games/[*.pgn").unwrap_err();
        assert!(matches!(err, Error::Pattern { .. }));
    }

    #[test]
    fn test_split_pgn_writes_both_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("dump.pgn");
        let pgn = [
            game("1800", "1900", "1-0", LONG_MOVES),
            game("1800", "1900", "0-1", LONG_MOVES),
            game("1800", "1900", "1/2-1/2", LONG_MOVES),
            game("1500", "1900", "1-0", LONG_MOVES),
            game("1800", "1900", "1-0", "1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7#"),
            game("1800", "1900", "0-1", "1. e4 { [%eval 0.2] } e5"),
        ]
        .concat();
        fs::write(&input, pgn).unwrap();

        let options = SplitOptions {
            input: input.display().to_string(),
            white: dir.path().join("csv/white.csv"),
            black: dir.path().join("csv/black.csv"),
            ..SplitOptions::default()
        };
        let report = split_pgn(&options).unwrap();

        assert_eq!(report.files, 1);
        assert_eq!(report.games, 6);
        assert_eq!(report.white, 1);
        assert_eq!(report.black, 1);
        assert_eq!(report.skipped_result, 1);
        assert_eq!(report.skipped_rating, 1);
        assert_eq!(report.skipped_length, 1);
        assert_eq!(report.skipped_eval, 1);

        let white = read_csv(&options.white);
        assert_eq!(white.len(), 1);
        assert_eq!(white[0].result, "1-0");
        assert!(white[0].moves.starts_with("e4 e5 Nf3 Nc6 Bb5"));
        assert!(white[0].moves.ends_with("Nxd6 1-0"));
        assert!(!white[0].moves.contains('.'));

        let black = read_csv(&options.black);
        assert_eq!(black.len(), 1);
        assert_eq!(black[0].result, "0-1");
    }

    #[test]
    fn test_split_pgn_empty_outputs_keep_header() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.pgn");
        fs::write(&input, "").unwrap();

        let options = SplitOptions {
            input: input.display().to_string(),
            white: dir.path().join("white.csv"),
            black: dir.path().join("black.csv"),
            ..SplitOptions::default()
        };
        let report = split_pgn(&options).unwrap();

        assert_eq!(report.games, 0);
        let header = fs::read_to_string(&options.white).unwrap();
        assert_eq!(
            header.trim_end(),
            "White,Black,Result,WhiteElo,BlackElo,TimeControl,Termination,Moves"
        );
    }

    #[test]
    fn test_split_pgn_single_missing_input_is_error() {
        let dir = tempdir().unwrap();
        let options = SplitOptions {
            input: dir.path().join("missing.pgn").display().to_string(),
            white: dir.path().join("white.csv"),
            black: dir.path().join("black.csv"),
            ..SplitOptions::default()
        };
        let err = split_pgn(&options).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }

    #[test]
    fn test_split_pgn_read_error_stops_that_file_only() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("a_broken.pgn.zst");
        fs::write(&broken, b"this is not a zstd frame").unwrap();
        let good = dir.path().join("b_good.pgn");
        fs::write(&good, game("2000", "2000", "1-0", LONG_MOVES)).unwrap();

        let options = SplitOptions {
            input: format!("{}/*.pgn*", dir.path().display()),
            white: dir.path().join("out/white.csv"),
            black: dir.path().join("out/black.csv"),
            ..SplitOptions::default()
        };
        let report = split_pgn(&options).unwrap();

        assert_eq!(report.files, 2);
        assert_eq!(report.parse_errors, 1);
        assert_eq!(report.games, 1);
        assert_eq!(report.white, 1);
    }

    #[test]
    fn test_split_pgn_reads_zstd_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("dump.pgn.zst");
        let pgn = game("2000", "2000", "0-1", LONG_MOVES);
        fs::write(&input, zstd::stream::encode_all(pgn.as_bytes(), 0).unwrap()).unwrap();

        let options = SplitOptions {
            input: input.display().to_string(),
            white: dir.path().join("white.csv"),
            black: dir.path().join("black.csv"),
            ..SplitOptions::default()
        };
        let report = split_pgn(&options).unwrap();
        assert_eq!(report.black, 1);
    }
}
