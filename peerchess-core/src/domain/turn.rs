use crate::domain::{AppliedMove, ChessMove, ChessRules, RulesError, Side};

/// Whose turn it is, from the local player's point of view.
///
/// A value type: every move step takes the current state and hands back the
/// next one. A rejected move returns an error and the caller keeps the state it
/// already had.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnState {
    local_side: Side,
    current_side: Side,
}

/// Errors from relaying a move through the turn state
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TurnError {
    #[error("Illegal move {mv}: {reason}")]
    IllegalMove { mv: ChessMove, reason: RulesError },

    #[error("Received move {0} while it is our own turn")]
    OutOfTurnMove(ChessMove),

    #[error("Attempted move {0} while waiting for the opponent")]
    NotLocalTurn(ChessMove),
}

impl TurnState {
    /// Fresh game: white moves first
    pub fn new(local_side: Side) -> Self {
        Self {
            local_side,
            current_side: Side::White,
        }
    }

    pub fn local_side(&self) -> Side {
        self.local_side
    }

    /// Side to move
    pub fn current_side(&self) -> Side {
        self.current_side
    }

    pub fn is_local_turn(&self) -> bool {
        self.current_side == self.local_side
    }

    /// Turn ownership after one accepted move
    pub fn flipped(self) -> Self {
        Self {
            local_side: self.local_side,
            current_side: self.current_side.opponent(),
        }
    }

    /// Validate a move made on this board before it is transmitted
    pub fn apply_local<R: ChessRules + ?Sized>(
        self,
        rules: &mut R,
        mv: &ChessMove,
    ) -> Result<(TurnState, AppliedMove), TurnError> {
        if !self.is_local_turn() {
            return Err(TurnError::NotLocalTurn(*mv));
        }
        self.apply(rules, mv)
    }

    /// Accept a move received from the opponent
    pub fn apply_remote<R: ChessRules + ?Sized>(
        self,
        rules: &mut R,
        mv: &ChessMove,
    ) -> Result<(TurnState, AppliedMove), TurnError> {
        if self.is_local_turn() {
            return Err(TurnError::OutOfTurnMove(*mv));
        }
        self.apply(rules, mv)
    }

    fn apply<R: ChessRules + ?Sized>(
        self,
        rules: &mut R,
        mv: &ChessMove,
    ) -> Result<(TurnState, AppliedMove), TurnError> {
        let applied = rules.apply(mv).map_err(|reason| TurnError::IllegalMove {
            mv: *mv,
            reason,
        })?;

        Ok((self.flipped(), applied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OccupancyRules;

    fn mv(notation: &str) -> ChessMove {
        ChessMove::parse_coordinate(notation).unwrap()
    }

    #[test]
    fn test_white_starts_with_turn() {
        assert!(TurnState::new(Side::White).is_local_turn());
        assert!(!TurnState::new(Side::Black).is_local_turn());
    }

    #[test]
    fn test_alternation_across_local_and_remote() {
        let mut rules = OccupancyRules::new();
        let turn = TurnState::new(Side::White);

        let (turn, _) = turn.apply_local(&mut rules, &mv("e2e4")).unwrap();
        assert!(!turn.is_local_turn());
        assert_eq!(turn.current_side(), Side::Black);

        let (turn, applied) = turn.apply_remote(&mut rules, &mv("e7e5")).unwrap();
        assert_eq!(applied.side, Side::Black);
        assert!(turn.is_local_turn());
        assert_eq!(turn.current_side(), Side::White);
    }

    #[test]
    fn test_out_of_turn_remote_move_leaves_state() {
        let mut rules = OccupancyRules::new();
        let turn = TurnState::new(Side::White);

        let result = turn.apply_remote(&mut rules, &mv("e7e5"));
        assert_eq!(result, Err(TurnError::OutOfTurnMove(mv("e7e5"))));
        assert!(turn.is_local_turn());
        assert_eq!(rules, OccupancyRules::new());
    }

    #[test]
    fn test_local_move_while_waiting() {
        let mut rules = OccupancyRules::new();
        let turn = TurnState::new(Side::Black);

        let result = turn.apply_local(&mut rules, &mv("e7e5"));
        assert!(matches!(result, Err(TurnError::NotLocalTurn(_))));
    }

    #[test]
    fn test_illegal_remote_move_does_not_flip() {
        let mut rules = OccupancyRules::new();
        let turn = TurnState::new(Side::Black);

        // Black piece moved on white's turn
        let result = turn.apply_remote(&mut rules, &mv("e7e5"));
        assert!(matches!(result, Err(TurnError::IllegalMove { .. })));
        assert!(!turn.is_local_turn());
    }
}
