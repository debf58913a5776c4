pub mod chess_move;
pub mod media;
pub mod message;
pub mod role;
pub mod room;
pub mod room_protocol;
pub mod room_table;
pub mod rules;
pub mod turn;

pub use chess_move::{ChessMove, MoveParseError, PromotionPiece, Square};
pub use media::{CallRole, LocalStream, MediaCallSession, MediaConstraints};
pub use message::SessionMessage;
pub use role::{Role, Side};
pub use room::{RoomId, RoomIdError, RoomRecord};
pub use room_protocol::{RoomOp, RoomRequest, RoomResponse, RoomResult};
pub use room_table::{OwnerId, RoomTable};
pub use rules::{AppliedMove, ChessRules, OccupancyRules, Piece, PieceKind, RulesError};
pub use turn::{TurnError, TurnState};
