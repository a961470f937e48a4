use std::fmt::Display;

use log::{debug, error};

use crate::board::{Board, PlacedPiece, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// One diagonal step
    Simple,
    /// Two diagonal steps over an opposing piece
    Capture,
}

/// Capture progress of the turn in progress. Owned by the turn and reset only when the turn ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Open,
    /// A capture happened this turn so only further captures are legal
    MustContinue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(from: Square, to: Square, kind: MoveKind) -> Move {
        Move { from, to, kind }
    }

    pub fn is_capture(&self) -> bool {
        self.kind == MoveKind::Capture
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let separator = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{}{}", self.from, separator, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub captured: Option<PlacedPiece>,
    pub promoted: bool,
    pub capture_state: CaptureState,
}

impl Board {
    /// Applies an already validated move: takes the jumped piece for captures, relocates the mover and
    /// promotes it on its farthest row. The returned capture state belongs to the current turn.
    pub fn apply_move(&mut self, m: &Move) -> MoveReport {
        let Some(mover) = self.get(m.from) else {
            error!("Cannot apply {m}, no piece on {}. {self:?}", m.from);
            panic!("Cannot apply a move from an empty square");
        };

        let mut captured = None;
        if m.is_capture() {
            let jumped = m.from.midpoint(m.to);
            // Check before touching the board so a bad capture never leaves half a move behind
            match self.get(jumped) {
                Some(piece) if piece.color != mover.color && self.is_empty_square(m.to) => {
                    self.remove(jumped);
                    captured = Some(PlacedPiece { square: jumped, piece });
                }
                other => {
                    error!("Cannot apply capture {m}, jumped square holds {other:?}. {self:?}");
                    panic!("Cannot apply a capture without an opposing piece to jump");
                }
            }
        }

        self.move_piece(m.from, m.to);
        let promoted = self.promote_if_farthest(m.to);

        debug!(
            "{} {} {m}{}",
            mover.color.name(),
            if mover.is_king() { "king" } else { "man" },
            if promoted { " and is promoted" } else { "" }
        );

        MoveReport {
            captured,
            promoted,
            capture_state: if m.is_capture() {
                CaptureState::MustContinue
            } else {
                CaptureState::Open
            },
        }
    }
}

#[cfg(test)]
mod moves_tests {
    use crate::board::{Color, Piece, Square};

    use super::*;

    #[test]
    pub fn capture_removes_jumped_piece_from_board_and_side() {
        let mut board = Board::from_diagram("8/8/8/8/5d2/4l3/8/1d6").unwrap();

        let report = board.apply_move(&Move::new(Square::new(5, 4), Square::new(3, 6), MoveKind::Capture));

        assert_eq!(
            Some(PlacedPiece {
                square: Square::new(4, 5),
                piece: Piece::man(Color::Dark)
            }),
            report.captured
        );
        assert_eq!(CaptureState::MustContinue, report.capture_state);
        assert!(board.get(Square::new(4, 5)).is_none());
        assert!(board.get(Square::new(5, 4)).is_none());
        assert_eq!(Some(Piece::man(Color::Light)), board.get(Square::new(3, 6)));
        assert_eq!(1, board.piece_count(Color::Dark));
        assert!(board.side_pieces(Color::Dark).iter().all(|p| p.square != Square::new(4, 5)));
    }

    #[test]
    pub fn simple_move_onto_back_rank_promotes() {
        let mut board = Board::from_diagram("8/1l6/8/8/8/8/8/8").unwrap();

        let report = board.apply_move(&Move::new(Square::new(1, 1), Square::new(0, 2), MoveKind::Simple));

        assert!(report.promoted);
        assert_eq!(CaptureState::Open, report.capture_state);
        assert_eq!(Some(Piece::king(Color::Light)), board.get(Square::new(0, 2)));
    }

    #[test]
    #[should_panic(expected = "opposing piece")]
    pub fn capture_over_own_piece_is_fatal() {
        let mut board = Board::from_diagram("8/8/8/8/8/8/1l6/l7").unwrap();
        board.apply_move(&Move::new(Square::new(7, 0), Square::new(5, 2), MoveKind::Capture));
    }

    #[test]
    pub fn display_marks_captures() {
        let capture = Move::new(Square::new(5, 4), Square::new(3, 6), MoveKind::Capture);
        let simple = Move::new(Square::new(5, 6), Square::new(4, 5), MoveKind::Simple);

        assert_eq!("(5, 4)x(3, 6)", capture.to_string());
        assert_eq!("(5, 6)-(4, 5)", simple.to_string());
    }
}
