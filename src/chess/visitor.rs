use super::types::GameRecord;
use pgn_reader::{Outcome, RawComment, RawTag, SanPlus, Skip, Visitor};
use std::fmt::Write;
use std::ops::ControlFlow;

/// Header tags kept for the split CSV files.
#[derive(Debug, Default)]
pub struct Headers {
    white: String,
    black: String,
    result: String,
    white_elo: String,
    black_elo: String,
    time_control: String,
    termination: String,
}

impl Headers {
    fn set_known_tag(&mut self, key: &[u8], value: RawTag<'_>) {
        let slot: &mut String = match key {
            b"White" => &mut self.white,
            b"Black" => &mut self.black,
            b"Result" => &mut self.result,
            b"WhiteElo" => &mut self.white_elo,
            b"BlackElo" => &mut self.black_elo,
            b"TimeControl" => &mut self.time_control,
            b"Termination" => &mut self.termination,
            _ => return,
        };

        if !slot.is_empty() {
            return;
        }
        *slot = String::from_utf8_lossy(value.as_bytes()).into_owned();
    }
}

pub struct MainlineMoves {
    headers: Headers,
    sans: String,
    plies: u32,
    outcome: Option<String>,
    has_eval: bool,
}

/// A mainline game as read from PGN, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnGame {
    pub record: GameRecord,
    pub plies: u32,
    /// Some comment carried a `%eval` annotation.
    pub has_eval: bool,
}

impl PgnGame {
    pub fn full_moves(&self) -> u32 {
        self.plies / 2
    }
}

/// Streaming pgn-reader visitor collecting headers and mainline SAN.
///
/// Variations are skipped, comments are only inspected for `%eval`. The
/// `Moves` column holds space-separated SAN without move numbers, followed by
/// the result marker.
#[derive(Default)]
pub struct SplitVisitor;

impl Visitor for SplitVisitor {
    type Tags = Headers;
    type Movetext = MainlineMoves;
    type Output = PgnGame;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(Headers::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        key: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        tags.set_known_tag(key, value);
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(MainlineMoves {
            headers: tags,
            sans: String::with_capacity(512),
            plies: 0,
            outcome: None,
            has_eval: false,
        })
    }

    fn begin_variation(&mut self, _: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        if !movetext.sans.is_empty() {
            movetext.sans.push(' ');
        }
        let _ = write!(movetext.sans, "{}", san);
        movetext.plies += 1;
        ControlFlow::Continue(())
    }

    fn comment(
        &mut self,
        movetext: &mut Self::Movetext,
        comment: RawComment<'_>,
    ) -> ControlFlow<Self::Output> {
        if comment.as_bytes().windows(5).any(|w| w == b"%eval") {
            movetext.has_eval = true;
        }
        ControlFlow::Continue(())
    }

    fn outcome(
        &mut self,
        movetext: &mut Self::Movetext,
        outcome: Outcome,
    ) -> ControlFlow<Self::Output> {
        movetext.outcome = Some(outcome.to_string());
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        let MainlineMoves {
            headers,
            mut sans,
            plies,
            outcome,
            has_eval,
        } = movetext;

        let marker = outcome.unwrap_or_else(|| headers.result.clone());
        let result = if headers.result.is_empty() {
            marker.clone()
        } else {
            headers.result
        };

        if !marker.is_empty() {
            if !sans.is_empty() {
                sans.push(' ');
            }
            sans.push_str(&marker);
        }

        PgnGame {
            record: GameRecord {
                white: headers.white,
                black: headers.black,
                result,
                white_elo: headers.white_elo,
                black_elo: headers.black_elo,
                time_control: headers.time_control,
                termination: headers.termination,
                moves: sans,
            },
            plies,
            has_eval,
        }
    }
}
