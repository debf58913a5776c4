use crate::domain::{ChessMove, PromotionPiece, Side, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of chess piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl From<PromotionPiece> for PieceKind {
    fn from(piece: PromotionPiece) -> Self {
        match piece {
            PromotionPiece::Queen => PieceKind::Queen,
            PromotionPiece::Rook => PieceKind::Rook,
            PromotionPiece::Bishop => PieceKind::Bishop,
            PromotionPiece::Knight => PieceKind::Knight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.side {
            Side::White => write!(f, "{}", c.to_ascii_uppercase()),
            Side::Black => write!(f, "{}", c),
        }
    }
}

/// A move the rules engine accepted and applied to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub mv: ChessMove,
    pub side: Side,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

/// Rejections from the rules engine
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RulesError {
    #[error("No piece on {0}")]
    EmptySquare(Square),

    #[error("Piece on {square} belongs to {owner}, but {to_move} is to move")]
    WrongSide {
        square: Square,
        owner: Side,
        to_move: Side,
    },

    #[error("Move {0} does not change the position")]
    NullMove(ChessMove),

    #[error("Cannot capture own piece on {0}")]
    OwnPieceCapture(Square),

    #[error("Promotion is only allowed for a pawn reaching the last rank: {0}")]
    InvalidPromotion(ChessMove),
}

/// Move legality engine consulted for every local and remote move
///
/// Implementations own their position; `apply` either mutates it and returns
/// the applied move or leaves it untouched and returns a rejection.
pub trait ChessRules {
    fn side_to_move(&self) -> Side;

    fn apply(&mut self, mv: &ChessMove) -> Result<AppliedMove, RulesError>;
}

/// Rules engine that tracks piece occupancy only.
///
/// Enforces ownership, no self-capture and promotion placement. Piece geometry,
/// check and special moves are left to a full engine plugged in through
/// [`ChessRules`].
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyRules {
    board: [[Option<Piece>; 8]; 8],
    to_move: Side,
}

impl OccupancyRules {
    /// Standard starting position, white to move
    pub fn new() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = [[None; 8]; 8];
        for (file, kind) in BACK_RANK.iter().enumerate() {
            board[0][file] = Some(Piece {
                side: Side::White,
                kind: *kind,
            });
            board[1][file] = Some(Piece {
                side: Side::White,
                kind: PieceKind::Pawn,
            });
            board[6][file] = Some(Piece {
                side: Side::Black,
                kind: PieceKind::Pawn,
            });
            board[7][file] = Some(Piece {
                side: Side::Black,
                kind: *kind,
            });
        }

        Self {
            board,
            to_move: Side::White,
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.rank() as usize][square.file() as usize]
    }

    /// Render the board as eight text rows, rank 8 first
    pub fn ascii_rows(&self) -> Vec<String> {
        (0..8)
            .rev()
            .map(|rank| {
                let cells: String = (0..8)
                    .map(|file| match self.board[rank][file] {
                        Some(piece) => piece.to_string(),
                        None => ".".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{} {}", rank + 1, cells)
            })
            .collect()
    }

    fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.board[square.rank() as usize][square.file() as usize] = piece;
    }

    fn last_rank(side: Side) -> u8 {
        match side {
            Side::White => 7,
            Side::Black => 0,
        }
    }
}

impl Default for OccupancyRules {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessRules for OccupancyRules {
    fn side_to_move(&self) -> Side {
        self.to_move
    }

    fn apply(&mut self, mv: &ChessMove) -> Result<AppliedMove, RulesError> {
        if mv.from == mv.to {
            return Err(RulesError::NullMove(*mv));
        }

        let piece = self
            .piece_at(mv.from)
            .ok_or(RulesError::EmptySquare(mv.from))?;

        if piece.side != self.to_move {
            return Err(RulesError::WrongSide {
                square: mv.from,
                owner: piece.side,
                to_move: self.to_move,
            });
        }

        let captured = self.piece_at(mv.to);
        if captured.is_some_and(|target| target.side == piece.side) {
            return Err(RulesError::OwnPieceCapture(mv.to));
        }

        let reaches_last_rank =
            piece.kind == PieceKind::Pawn && mv.to.rank() == Self::last_rank(piece.side);
        let placed = match mv.promotion {
            Some(promotion) if reaches_last_rank => Piece {
                side: piece.side,
                kind: promotion.into(),
            },
            Some(_) => return Err(RulesError::InvalidPromotion(*mv)),
            // Unspecified promotion defaults to a queen
            None if reaches_last_rank => Piece {
                side: piece.side,
                kind: PieceKind::Queen,
            },
            None => piece,
        };

        self.set(mv.from, None);
        self.set(mv.to, Some(placed));
        self.to_move = self.to_move.opponent();

        Ok(AppliedMove {
            mv: *mv,
            side: piece.side,
            piece,
            captured,
        })
    }
}
