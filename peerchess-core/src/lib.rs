pub mod domain;

pub use domain::{
    AppliedMove, CallRole, ChessMove, ChessRules, LocalStream, MediaCallSession,
    MediaConstraints, MoveParseError, OccupancyRules, OwnerId, Piece, PieceKind, PromotionPiece,
    Role, RoomId, RoomIdError, RoomOp, RoomRecord, RoomRequest, RoomResponse, RoomResult,
    RoomTable, RulesError, SessionMessage, Side, Square, TurnError, TurnState,
};
