//! Bitboard feature encoding of a single position.
//!
//! Layout, 773 `u8` flags:
//! - for color in [`COLORS`], for role in [`ROLES`]: 64 flags, square a1=0,
//!   b1=1, ..., h1=7, a2=8, ..., h8=63; 1 iff that square holds that piece.
//! - side to move (1 = white), then castling rights: white kingside, white
//!   queenside, black kingside, black queenside.
//!
//! Role order is pawn, rook, knight, bishop, queen, king. It differs from
//! `shakmaty::Role::ALL` and existing datasets depend on it, so do not reorder.

use shakmaty::{CastlingSide, Chess, Color, Piece, Position, Role};

pub const COLORS: [Color; 2] = [Color::White, Color::Black];

pub const ROLES: [Role; 6] = [
    Role::Pawn,
    Role::Rook,
    Role::Knight,
    Role::Bishop,
    Role::Queen,
    Role::King,
];

pub const SQUARES: usize = 64;
pub const PLANES: usize = COLORS.len() * ROLES.len();
pub const PLANE_FLAGS: usize = PLANES * SQUARES;
pub const SCALAR_FLAGS: usize = 5;
pub const FEATURE_LEN: usize = PLANE_FLAGS + SCALAR_FLAGS;

const SIDE_TO_MOVE: usize = PLANE_FLAGS;
const CASTLING: [(Color, CastlingSide); 4] = [
    (Color::White, CastlingSide::KingSide),
    (Color::White, CastlingSide::QueenSide),
    (Color::Black, CastlingSide::KingSide),
    (Color::Black, CastlingSide::QueenSide),
];

#[derive(Clone, PartialEq, Eq)]
pub struct FeatureVector([u8; FEATURE_LEN]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// The 64 flags for one (color, role) pair.
    pub fn plane(&self, color: Color, role: Role) -> &[u8] {
        let start = plane_index(color, role) * SQUARES;
        &self.0[start..start + SQUARES]
    }

    pub fn white_to_move(&self) -> bool {
        self.0[SIDE_TO_MOVE] == 1
    }

    pub fn castling_right(&self, color: Color, side: CastlingSide) -> bool {
        CASTLING
            .iter()
            .position(|&entry| entry == (color, side))
            .is_some_and(|i| self.0[SIDE_TO_MOVE + 1 + i] == 1)
    }
}

impl std::fmt::Debug for FeatureVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pieces = self.0[..PLANE_FLAGS].iter().filter(|&&v| v == 1).count();
        f.debug_struct("FeatureVector")
            .field("pieces", &pieces)
            .field("scalars", &&self.0[PLANE_FLAGS..])
            .finish()
    }
}

fn plane_index(color: Color, role: Role) -> usize {
    let color_idx = match color {
        Color::White => 0,
        Color::Black => 1,
    };
    let role_idx = match role {
        Role::Pawn => 0,
        Role::Rook => 1,
        Role::Knight => 2,
        Role::Bishop => 3,
        Role::Queen => 4,
        Role::King => 5,
    };
    color_idx * ROLES.len() + role_idx
}

pub fn encode(pos: &Chess) -> FeatureVector {
    let mut flags = [0u8; FEATURE_LEN];
    let board = pos.board();

    for color in COLORS {
        for role in ROLES {
            let offset = plane_index(color, role) * SQUARES;
            for sq in board.by_piece(Piece { color, role }) {
                flags[offset + sq as usize] = 1;
            }
        }
    }

    flags[SIDE_TO_MOVE] = u8::from(pos.turn() == Color::White);
    let castles = pos.castles();
    for (i, (color, side)) in CASTLING.into_iter().enumerate() {
        flags[SIDE_TO_MOVE + 1 + i] = u8::from(castles.has(color, side));
    }

    FeatureVector(flags)
}
