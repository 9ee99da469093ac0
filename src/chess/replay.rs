use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use log::debug;
use serde::Serialize;
use shakmaty::san::{ParseSanError, SanError, SanPlus};
use shakmaty::{Chess, Position};

use super::filter::{Token, clean_movetext, tokenize};

/// Move counts observed while replaying one or more games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    pub successful: u64,
    pub failed: u64,
}

impl ReplayStats {
    /// Illegal moves per applied move; `None` until a move has been applied.
    pub fn failure_ratio(&self) -> Option<f64> {
        match self.successful {
            0 => None,
            applied => Some(self.failed as f64 / applied as f64),
        }
    }
}

impl AddAssign for ReplayStats {
    fn add_assign(&mut self, rhs: Self) {
        self.successful += rhs.successful;
        self.failed += rhs.failed;
    }
}

impl Add for ReplayStats {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sum for ReplayStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug)]
pub enum RejectReason {
    /// Not SAN at all.
    Syntax(ParseSanError),
    /// Valid SAN that names no legal move in the current position.
    Illegal(SanError),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(e) => write!(f, "syntax: {e}"),
            Self::Illegal(e) => write!(f, "illegal: {e}"),
        }
    }
}

#[derive(Debug)]
pub enum MoveOutcome {
    Applied,
    Rejected(RejectReason),
}

/// Try to play one SAN token. The position is left untouched on rejection.
pub fn apply_san(pos: &mut Chess, token: &str) -> MoveOutcome {
    let san: SanPlus = match token.parse() {
        Ok(san) => san,
        Err(e) => return MoveOutcome::Rejected(RejectReason::Syntax(e)),
    };

    match san.san.to_move(&*pos) {
        Ok(m) => {
            pos.play_unchecked(m);
            MoveOutcome::Applied
        }
        Err(e) => MoveOutcome::Rejected(RejectReason::Illegal(e)),
    }
}

#[derive(Debug, Clone)]
pub struct Replay {
    pub position: Chess,
    pub stats: ReplayStats,
}

/// Replay a game's movetext from the standard starting position.
///
/// A rejected token is counted and skipped; the following tokens are tried
/// against the same, unadvanced position.
// TODO: confirm whether a rejected token should abort the rest of the game
// instead of replaying the remaining tokens against the stale position.
pub fn replay(movetext: &str) -> Replay {
    let clean = clean_movetext(movetext);
    let mut position = Chess::default();
    let mut stats = ReplayStats::default();

    for token in tokenize(&clean) {
        let Token::Move(san) = token else {
            continue;
        };

        match apply_san(&mut position, san) {
            MoveOutcome::Applied => stats.successful += 1,
            MoveOutcome::Rejected(reason) => {
                stats.failed += 1;
                debug!("Illegal move encountered: {san} ({reason})");
            }
        }
    }

    Replay { position, stats }
}
