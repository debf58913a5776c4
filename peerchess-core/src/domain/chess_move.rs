use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board coordinate in algebraic form (`a1`..`h8`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

/// Errors raised while parsing moves and squares
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MoveParseError {
    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid move notation: {0}")]
    InvalidNotation(String),

    #[error("Invalid promotion piece: {0}")]
    InvalidPromotion(char),
}

impl Square {
    /// Create from zero-based file and rank indices
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then_some(Self { file, rank })
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn parse(s: &str) -> Result<Self, MoveParseError> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(MoveParseError::InvalidSquare(s.to_string()));
        };

        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(MoveParseError::InvalidSquare(s.to_string()));
        }

        Ok(Self {
            file: file as u8 - b'a',
            rank: rank as u8 - b'1',
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

impl FromStr for Square {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Square {
    type Error = MoveParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

/// Piece a pawn turns into on the last rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PromotionPiece {
    #[serde(rename = "q")]
    Queen,
    #[serde(rename = "r")]
    Rook,
    #[serde(rename = "b")]
    Bishop,
    #[serde(rename = "n")]
    Knight,
}

impl PromotionPiece {
    pub fn from_char(c: char) -> Result<Self, MoveParseError> {
        match c.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            other => Err(MoveParseError::InvalidPromotion(other)),
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
        }
    }
}

/// Move object exchanged between peers and handed to the rules engine
///
/// Only `from`, `to` and `promotion` travel on the wire; any extra fields a
/// remote engine attaches are ignored on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ChessMove {
    #[schemars(with = "String")]
    pub from: Square,

    #[schemars(with = "String")]
    pub to: Square,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionPiece>,
}

impl ChessMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, piece: PromotionPiece) -> Self {
        self.promotion = Some(piece);
        self
    }

    /// Parse coordinate notation: `e2e4`, `e2-e4`, `e7e8q`
    pub fn parse_coordinate(notation: &str) -> Result<Self, MoveParseError> {
        let compact: String = notation
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | ' '))
            .collect();

        if !(compact.len() == 4 || compact.len() == 5) || !compact.is_ascii() {
            return Err(MoveParseError::InvalidNotation(notation.to_string()));
        }

        let from = Square::parse(&compact[0..2])?;
        let to = Square::parse(&compact[2..4])?;
        let mut mv = Self::new(from, to);

        if let Some(c) = compact.chars().nth(4) {
            mv = mv.with_promotion(PromotionPiece::from_char(c)?);
        }

        Ok(mv)
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for ChessMove {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_coordinate(s)
    }
}
