use log::trace;

use crate::{
    board::{Board, Color, Piece, Rank, Square},
    moves::{CaptureState, Move, MoveKind},
};

// Row and column offsets, in the order the computer tries them. Forward comes first for every piece.
const DARK_MAN_STEPS: [(isize, isize); 2] = [(1, -1), (1, 1)];
const DARK_MAN_JUMPS: [(isize, isize); 2] = [(2, -2), (2, 2)];
const DARK_KING_STEPS: [(isize, isize); 4] = [(1, -1), (1, 1), (-1, -1), (-1, 1)];
const DARK_KING_JUMPS: [(isize, isize); 4] = [(2, -2), (2, 2), (-2, -2), (-2, 2)];
const LIGHT_MAN_STEPS: [(isize, isize); 2] = [(-1, -1), (-1, 1)];
const LIGHT_MAN_JUMPS: [(isize, isize); 2] = [(-2, -2), (-2, 2)];
const LIGHT_KING_STEPS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const LIGHT_KING_JUMPS: [(isize, isize); 4] = [(-2, -2), (-2, 2), (2, -2), (2, 2)];

/// Candidate offsets for a piece of `color` and `rank` making a move of `kind`
pub fn directions(color: Color, rank: Rank, kind: MoveKind) -> &'static [(isize, isize)] {
    match (color, rank, kind) {
        (Color::Dark, Rank::Man, MoveKind::Simple) => &DARK_MAN_STEPS,
        (Color::Dark, Rank::Man, MoveKind::Capture) => &DARK_MAN_JUMPS,
        (Color::Dark, Rank::King, MoveKind::Simple) => &DARK_KING_STEPS,
        (Color::Dark, Rank::King, MoveKind::Capture) => &DARK_KING_JUMPS,
        (Color::Light, Rank::Man, MoveKind::Simple) => &LIGHT_MAN_STEPS,
        (Color::Light, Rank::Man, MoveKind::Capture) => &LIGHT_MAN_JUMPS,
        (Color::Light, Rank::King, MoveKind::Simple) => &LIGHT_KING_STEPS,
        (Color::Light, Rank::King, MoveKind::Capture) => &LIGHT_KING_JUMPS,
    }
}

pub fn is_move_diagonal(from: Square, to: Square) -> bool {
    from.row_delta(to).abs() == from.col_delta(to).abs()
}

/// Men only move toward the opponent's back rank, kings go anywhere
pub fn is_move_in_correct_direction(piece: &Piece, from: Square, to: Square) -> bool {
    if piece.is_king() {
        return true;
    }

    from.row_delta(to).signum() == piece.color.forward()
}

impl Board {
    /// Works out what kind of move `from` to `to` would be, or None if it is illegal.
    /// Both squares must be on the board. While `capture_state` is `MustContinue` only captures pass.
    pub fn classify_move(&self, from: Square, to: Square, capture_state: CaptureState) -> Option<MoveKind> {
        let piece = self.get(from)?;

        if !is_move_diagonal(from, to) {
            trace!("{from} to {to} is not diagonal");
            return None;
        }

        if !self.is_empty_square(to) {
            trace!("{from} to {to}, destination is occupied");
            return None;
        }

        if !is_move_in_correct_direction(&piece, from, to) {
            trace!("{from} to {to} is backwards for a man");
            return None;
        }

        let kind = match from.row_delta(to).abs() {
            1 => MoveKind::Simple,
            2 if self.is_capture_valid(&piece, from, to) => MoveKind::Capture,
            distance => {
                trace!("{from} to {to} covers {distance} rows without a capture");
                return None;
            }
        };

        if capture_state == CaptureState::MustContinue && kind != MoveKind::Capture {
            trace!("{from} to {to} is not a capture but the turn must keep capturing");
            return None;
        }

        Some(kind)
    }

    pub fn is_legal(&self, from: Square, to: Square, capture_state: CaptureState) -> bool {
        self.classify_move(from, to, capture_state).is_some()
    }

    pub fn legal_move(&self, from: Square, to: Square, capture_state: CaptureState) -> Option<Move> {
        self.classify_move(from, to, capture_state)
            .map(|kind| Move::new(from, to, kind))
    }

    /// True if the square jumped over holds a piece of the other color
    pub fn is_capture_valid(&self, piece: &Piece, from: Square, to: Square) -> bool {
        self.get(from.midpoint(to))
            .is_some_and(|jumped| jumped.color != piece.color)
    }

    /// First capture available to the piece on `square` in direction table order
    pub fn first_capture_from(&self, square: Square) -> Option<Move> {
        let piece = self.get(square)?;
        directions(piece.color, piece.rank, MoveKind::Capture)
            .iter()
            .filter_map(|(dr, dc)| square.offset(*dr, *dc, self.size()))
            .find_map(|to| self.legal_move(square, to, CaptureState::MustContinue))
    }

    pub fn has_capture_from(&self, square: Square) -> bool {
        self.first_capture_from(square).is_some()
    }

    /// Every legal move for `color`, pieces in side order and directions in table order
    pub fn legal_moves(&self, color: Color, capture_state: CaptureState) -> Vec<Move> {
        let size = self.size();
        let mut moves = Vec::new();
        for placed in self.side_pieces(color) {
            let piece = placed.piece;
            for kind in [MoveKind::Capture, MoveKind::Simple] {
                moves.extend(
                    directions(piece.color, piece.rank, kind)
                        .iter()
                        .filter_map(|(dr, dc)| placed.square.offset(*dr, *dc, size))
                        .filter_map(|to| self.legal_move(placed.square, to, capture_state)),
                );
            }
        }
        moves
    }

    /// Stops at the first legal move found
    pub fn has_any_legal_move(&self, color: Color) -> bool {
        let size = self.size();
        self.side_pieces(color).iter().any(|placed| {
            [MoveKind::Capture, MoveKind::Simple].into_iter().any(|kind| {
                directions(placed.piece.color, placed.piece.rank, kind)
                    .iter()
                    .filter_map(|(dr, dc)| placed.square.offset(*dr, *dc, size))
                    .any(|to| self.is_legal(placed.square, to, CaptureState::Open))
            })
        })
    }
}

#[cfg(test)]
mod move_validation_tests {
    use super::*;

    const OPEN: CaptureState = CaptureState::Open;

    #[test]
    pub fn diagonal_check() {
        assert!(is_move_diagonal(Square::new(5, 0), Square::new(4, 1)));
        assert!(!is_move_diagonal(Square::new(5, 0), Square::new(5, 1)));
    }

    #[test]
    pub fn destination_must_be_empty() {
        let board = Board::default();

        assert!(board.is_empty_square(Square::new(4, 7)));
        assert!(!board.is_empty_square(Square::new(2, 1)));
        assert!(!board.is_legal(Square::new(1, 0), Square::new(2, 1), OPEN));
    }

    #[test]
    pub fn light_man_moves_up_only() {
        let board = Board::default();
        let piece = board.get(Square::new(5, 2)).unwrap();

        assert!(is_move_in_correct_direction(&piece, Square::new(5, 2), Square::new(4, 1)));
        assert!(!is_move_in_correct_direction(&piece, Square::new(5, 2), Square::new(6, 1)));
    }

    #[test]
    pub fn dark_man_moves_down_only() {
        let board = Board::from_diagram("8/8/8/3d4/8/8/8/8").unwrap();

        assert!(board.is_legal(Square::new(3, 3), Square::new(4, 4), OPEN));
        assert!(!board.is_legal(Square::new(3, 3), Square::new(2, 2), OPEN));
    }

    #[test]
    pub fn king_moves_both_ways() {
        let board = Board::from_diagram("8/8/8/3L4/8/8/8/8").unwrap();

        for to in [(2, 2), (2, 4), (4, 2), (4, 4)] {
            assert!(board.is_legal(Square::new(3, 3), Square::new(to.0, to.1), OPEN));
        }
    }

    #[test]
    pub fn two_row_move_without_capture_is_illegal() {
        let board = Board::default();

        assert_eq!(None, board.classify_move(Square::new(5, 4), Square::new(3, 6), OPEN));
        assert_eq!(
            Some(MoveKind::Simple),
            board.classify_move(Square::new(5, 4), Square::new(4, 5), OPEN)
        );
    }

    #[test]
    pub fn jump_over_opponent_is_capture() {
        let mut board = Board::default();
        board.move_piece(Square::new(2, 5), Square::new(4, 5));

        assert!(board.is_capture_valid(&board.get(Square::new(5, 4)).unwrap(), Square::new(5, 4), Square::new(3, 6)));
        assert_eq!(
            Some(MoveKind::Capture),
            board.classify_move(Square::new(5, 4), Square::new(3, 6), OPEN)
        );
    }

    #[test]
    pub fn jump_over_own_piece_is_illegal() {
        let board = Board::from_diagram("8/8/8/8/8/8/1l6/l7").unwrap();
        let piece = board.get(Square::new(7, 0)).unwrap();

        assert!(!board.is_capture_valid(&piece, Square::new(7, 0), Square::new(5, 2)));
        assert!(!board.is_legal(Square::new(7, 0), Square::new(5, 2), OPEN));
    }

    #[test]
    pub fn long_jumps_are_never_legal() {
        // Opponent two squares away, so a three or four row move would pass over it
        let board = Board::from_diagram("8/8/8/8/8/2d5/8/l7").unwrap();

        assert!(!board.is_legal(Square::new(7, 0), Square::new(4, 3), OPEN));
        assert!(!board.is_legal(Square::new(7, 0), Square::new(3, 4), OPEN));
    }

    #[test]
    pub fn forced_continuation_rejects_simple_moves() {
        let board = Board::from_diagram("8/8/8/4d3/5l2/8/8/8").unwrap();
        let from = Square::new(4, 5);

        assert!(board.is_legal(from, Square::new(3, 6), OPEN));
        assert!(!board.is_legal(from, Square::new(3, 6), CaptureState::MustContinue));
        assert_eq!(
            Some(MoveKind::Capture),
            board.classify_move(from, Square::new(2, 3), CaptureState::MustContinue)
        );
    }

    #[test]
    pub fn empty_origin_is_never_legal() {
        let board = Board::default();

        assert!(!board.is_legal(Square::new(4, 1), Square::new(3, 2), OPEN));
    }

    #[test]
    pub fn first_capture_follows_direction_order() {
        // Dark king with captures both up-left and down-right, down comes first for dark
        let board = Board::from_diagram("8/8/8/2l5/3D4/4l3/8/8").unwrap();

        assert_eq!(
            Some(Move::new(Square::new(4, 3), Square::new(6, 5), MoveKind::Capture)),
            board.first_capture_from(Square::new(4, 3))
        );
    }

    #[test]
    pub fn blocked_side_has_no_legal_move() {
        // Light man on (7, 0) wedged behind two dark men
        let board = Board::from_diagram("8/8/8/8/8/2d5/1d6/l7").unwrap();

        assert!(!board.has_any_legal_move(Color::Light));
        assert!(board.has_any_legal_move(Color::Dark));
    }

    #[test]
    pub fn starting_position_has_seven_moves_each() {
        let board = Board::default();

        assert_eq!(7, board.legal_moves(Color::Light, OPEN).len());
        assert_eq!(7, board.legal_moves(Color::Dark, OPEN).len());
    }
}
