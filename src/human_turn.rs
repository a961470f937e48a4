use log::{debug, trace};

use crate::{
    board::{Board, Color, Square},
    moves::{CaptureState, Move, MoveKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HumanTurnState {
    #[default]
    Idle,
    Selected(Square),
    /// The piece on this square just captured and keeps the turn
    ForcedContinuation(Square),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing changed, another destination may be tried
    NoMove,
    /// A capture was made, the same side and piece keep the turn
    CaptureContinues,
    /// A simple move ended the turn
    TurnComplete,
}

/// Turns a selection and a destination picked by the player into moves
#[derive(Debug, Clone, Default)]
pub struct HumanTurn {
    color: Color,
    state: HumanTurnState,
    capture_state: CaptureState,
}

impl HumanTurn {
    pub fn new(color: Color) -> HumanTurn {
        HumanTurn {
            color,
            ..Default::default()
        }
    }

    pub fn state(&self) -> HumanTurnState {
        self.state
    }

    pub fn capture_state(&self) -> CaptureState {
        self.capture_state
    }

    pub fn selected(&self) -> Option<Square> {
        match self.state {
            HumanTurnState::Idle => None,
            HumanTurnState::Selected(square) | HumanTurnState::ForcedContinuation(square) => Some(square),
        }
    }

    /// Selects one of the player's own pieces. The selection is locked while a capture chain is running.
    pub fn select(&mut self, board: &Board, square: Square) -> bool {
        if let HumanTurnState::ForcedContinuation(locked) = self.state {
            trace!("Ignoring selection of {square}, {locked} has to keep capturing");
            return false;
        }

        match board.get(square) {
            Some(piece) if piece.color == self.color => {
                self.state = HumanTurnState::Selected(square);
                true
            }
            _ => false,
        }
    }

    pub fn attempt_move(&mut self, board: &mut Board, dest: Square, selected: Option<Square>) -> MoveOutcome {
        let Some(from) = selected else {
            return MoveOutcome::NoMove;
        };

        if let HumanTurnState::ForcedContinuation(locked) = self.state {
            if locked != from {
                return MoveOutcome::NoMove;
            }
        }

        if !board.get(from).is_some_and(|p| p.color == self.color) {
            return MoveOutcome::NoMove;
        }

        let Some(m) = board.legal_move(from, dest, self.capture_state) else {
            return MoveOutcome::NoMove;
        };

        let report = board.apply_move(&m);
        match m.kind {
            MoveKind::Capture => {
                if let Some(captured) = report.captured {
                    debug!("{} took the {} piece on {}", self.color.name(), captured.piece.color.name(), captured.square);
                }
                self.capture_state = report.capture_state;
                self.state = HumanTurnState::ForcedContinuation(dest);
                MoveOutcome::CaptureContinues
            }
            MoveKind::Simple => {
                self.reset();
                MoveOutcome::TurnComplete
            }
        }
    }

    /// Legal moves for the player right now. During a capture chain only the capturing piece's captures.
    pub fn available_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = board.legal_moves(self.color, self.capture_state);
        if let HumanTurnState::ForcedContinuation(locked) = self.state {
            moves.retain(|m| m.from == locked);
        }
        moves
    }

    /// True once the piece that has been capturing has nothing left to capture
    pub fn chain_exhausted(&self, board: &Board) -> bool {
        match self.state {
            HumanTurnState::ForcedContinuation(square) => !board.has_capture_from(square),
            _ => false,
        }
    }

    /// Gives up the rest of a capture chain. Only possible after at least one capture this turn.
    pub fn end_turn(&mut self) -> bool {
        if self.capture_state != CaptureState::MustContinue {
            return false;
        }

        debug!("{} ends the turn after capturing", self.color.name());
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.state = HumanTurnState::Idle;
        self.capture_state = CaptureState::Open;
    }
}

#[cfg(test)]
mod human_turn_tests {
    use crate::board::{Piece, Rank};

    use super::*;

    fn light_turn() -> HumanTurn {
        HumanTurn::new(Color::Light)
    }

    #[test]
    pub fn regular_move() {
        let mut board = Board::from_diagram("8/8/8/8/8/2l5/8/8").unwrap();
        let mut turn = light_turn();

        let outcome = turn.attempt_move(&mut board, Square::new(4, 1), Some(Square::new(5, 2)));

        assert_eq!(MoveOutcome::TurnComplete, outcome);
        assert_eq!(Some(Piece::man(Color::Light)), board.get(Square::new(4, 1)));
        assert_eq!(HumanTurnState::Idle, turn.state());
    }

    #[test]
    pub fn regular_king_move_backwards() {
        let mut board = Board::from_diagram("8/8/8/8/6L1/8/8/8").unwrap();
        let mut turn = light_turn();

        let outcome = turn.attempt_move(&mut board, Square::new(5, 7), Some(Square::new(4, 6)));

        assert_eq!(MoveOutcome::TurnComplete, outcome);
        assert_eq!(Some(Piece::king(Color::Light)), board.get(Square::new(5, 7)));
    }

    #[test]
    pub fn no_selection_is_no_move() {
        let mut board = Board::default();
        let before = board.clone();

        assert_eq!(MoveOutcome::NoMove, light_turn().attempt_move(&mut board, Square::new(4, 1), None));
        assert_eq!(before, board);
    }

    macro_rules! no_move_test {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (from, to) = $value;
                    let mut board = Board::default();
                    let before = board.clone();

                    let outcome = light_turn().attempt_move(&mut board, Square::new(to.0, to.1), Some(Square::new(from.0, from.1)));

                    assert_eq!(MoveOutcome::NoMove, outcome);
                    assert_eq!(before.raw_grid(), board.raw_grid());
                }
            )*
        }
    }

    no_move_test! {
        occupied_destination: ((6, 1), (5, 2)),
        not_diagonal: ((5, 2), (4, 2)),
        backwards_man: ((5, 2), (6, 3)),
        too_far: ((5, 2), (3, 4)),
        opponent_piece_selected: ((2, 1), (3, 2)),
    }

    #[test]
    pub fn capture_keeps_the_turn() {
        let mut board = Board::from_diagram("8/8/8/8/5d2/4l3/8/1d6").unwrap();
        let mut turn = light_turn();

        let outcome = turn.attempt_move(&mut board, Square::new(3, 6), Some(Square::new(5, 4)));

        assert_eq!(MoveOutcome::CaptureContinues, outcome);
        assert_eq!(CaptureState::MustContinue, turn.capture_state());
        assert_eq!(HumanTurnState::ForcedContinuation(Square::new(3, 6)), turn.state());
        assert!(board.get(Square::new(4, 5)).is_none());
        assert_eq!(1, board.side_pieces(Color::Dark).len());
    }

    #[test]
    pub fn no_simple_move_after_capture() {
        let mut board = Board::from_diagram("8/8/8/6d1/7l/8/8/8").unwrap();
        let mut turn = light_turn();
        let piece = Some(Square::new(4, 7));

        assert_eq!(
            MoveOutcome::CaptureContinues,
            turn.attempt_move(&mut board, Square::new(2, 5), piece)
        );

        let piece = turn.selected();
        assert_eq!(MoveOutcome::NoMove, turn.attempt_move(&mut board, Square::new(0, 3), piece));
        assert_eq!(MoveOutcome::NoMove, turn.attempt_move(&mut board, Square::new(1, 4), piece));
        assert_eq!(Some(Piece::man(Color::Light)), board.get(Square::new(2, 5)));
        assert_eq!(CaptureState::MustContinue, turn.capture_state());
    }

    #[test]
    pub fn multi_capture_with_promotion_and_backwards_jump() {
        let mut board = Board::empty(8).unwrap();
        board
            .set_side_pieces(
                Color::Dark,
                &[
                    (Square::new(1, 2), Rank::Man),
                    (Square::new(3, 6), Rank::Man),
                    (Square::new(1, 4), Rank::Man),
                ],
            )
            .unwrap();
        board
            .set_side_pieces(Color::Light, &[(Square::new(4, 7), Rank::Man)])
            .unwrap();
        let mut turn = light_turn();

        let mut piece = Some(Square::new(4, 7));
        for dest in [Square::new(2, 5), Square::new(0, 3), Square::new(2, 1)] {
            assert_eq!(MoveOutcome::CaptureContinues, turn.attempt_move(&mut board, dest, piece));
            piece = turn.selected();
        }

        assert!(board.side_pieces(Color::Dark).is_empty());
        assert_eq!(Some(Piece::king(Color::Light)), board.get(Square::new(2, 1)));
        assert!(turn.chain_exhausted(&board));
    }

    #[test]
    pub fn selection_rules() {
        let mut board = Board::from_diagram("8/8/8/8/5d2/4l3/8/l7").unwrap();
        let mut turn = light_turn();

        assert!(!turn.select(&board, Square::new(4, 5)));
        assert!(!turn.select(&board, Square::new(3, 3)));
        assert!(turn.select(&board, Square::new(7, 0)));
        assert!(turn.select(&board, Square::new(5, 4)));

        let selected = turn.selected();
        turn.attempt_move(&mut board, Square::new(3, 6), selected);

        // Locked onto the capturing piece until the turn ends
        assert!(!turn.select(&board, Square::new(7, 0)));
        assert_eq!(
            MoveOutcome::NoMove,
            turn.attempt_move(&mut board, Square::new(6, 1), Some(Square::new(7, 0)))
        );
        assert!(turn.end_turn());
        assert!(turn.select(&board, Square::new(7, 0)));
    }

    #[test]
    pub fn available_moves_follow_the_chain() {
        let mut board = Board::from_diagram("8/8/8/8/5d2/4l3/8/l7").unwrap();
        let mut turn = light_turn();

        assert_eq!(3, turn.available_moves(&board).len());

        turn.select(&board, Square::new(5, 4));
        turn.attempt_move(&mut board, Square::new(3, 6), Some(Square::new(5, 4)));

        // Nothing left to jump from (3, 6) and the man on (7, 0) is locked out
        assert!(turn.available_moves(&board).is_empty());
    }

    #[test]
    pub fn end_turn_needs_a_capture() {
        let mut turn = light_turn();

        assert!(!turn.end_turn());
    }
}
