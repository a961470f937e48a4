use log::{debug, info};

use crate::{
    board::{Board, Color, Rank, Square},
    move_validation::directions,
    moves::{CaptureState, Move, MoveKind},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputerTurn {
    /// Moves made in order. More than one only for capture chains.
    Moved(Vec<Move>),
    NoLegalMove,
}

impl ComputerTurn {
    pub fn moves(&self) -> &[Move] {
        match self {
            ComputerTurn::Moved(moves) => moves,
            ComputerTurn::NoLegalMove => &[],
        }
    }
}

/// Tried in order, the first level with a legal move wins
const PRIORITIES: [(Rank, MoveKind); 4] = [
    (Rank::King, MoveKind::Capture),
    (Rank::Man, MoveKind::Capture),
    (Rank::Man, MoveKind::Simple),
    (Rank::King, MoveKind::Simple),
];

impl Board {
    /// Plays a whole turn for `color` without looking ahead: the first legal move found in priority order,
    /// then every capture that follows from it.
    pub fn computer_move(&mut self, color: Color) -> ComputerTurn {
        let mut moves = Vec::new();

        for (rank, kind) in PRIORITIES {
            let found = match kind {
                MoveKind::Capture => self.try_capture(color, rank, &mut moves),
                MoveKind::Simple => self.try_simple_move(color, rank, &mut moves),
            };
            if found {
                info!(
                    "{} plays {}",
                    color.name(),
                    moves.iter().map(|m| m.to_string()).collect::<Vec<String>>().join(" ")
                );
                return ComputerTurn::Moved(moves);
            }
        }

        info!("{} has no legal move", color.name());
        ComputerTurn::NoLegalMove
    }

    /// Finds the first capture among the pieces of `rank` and plays out its chain
    fn try_capture(&mut self, color: Color, rank: Rank, moves: &mut Vec<Move>) -> bool {
        let jumps = directions(color, rank, MoveKind::Capture);
        let Some(m) = self.first_move_for(color, rank, jumps, CaptureState::MustContinue) else {
            return false;
        };

        self.capture_chain(m, jumps, moves);
        true
    }

    fn try_simple_move(&mut self, color: Color, rank: Rank, moves: &mut Vec<Move>) -> bool {
        let steps = directions(color, rank, MoveKind::Simple);
        let Some(m) = self.first_move_for(color, rank, steps, CaptureState::Open) else {
            return false;
        };

        self.apply_move(&m);
        moves.push(m);
        true
    }

    /// First legal move over the pieces of `color` and `rank` in side order, offsets in the order given
    fn first_move_for(
        &self,
        color: Color,
        rank: Rank,
        offsets: &[(isize, isize)],
        capture_state: CaptureState,
    ) -> Option<Move> {
        let size = self.size();
        let pieces = match rank {
            Rank::King => self.king_pieces(color),
            Rank::Man => {
                let mut men = self.side_pieces(color);
                men.retain(|p| !p.piece.is_king());
                men
            }
        };
        pieces
            .iter()
            .find_map(|p| {
                offsets
                    .iter()
                    .filter_map(|(dr, dc)| p.square.offset(*dr, *dc, size))
                    .find_map(|to| self.legal_move(p.square, to, capture_state))
            })
    }

    /// Plays capture `m`, lets any king carry on capturing, then continues with the capturing piece
    /// using `jumps` until it has nothing left to take.
    fn capture_chain(&mut self, m: Move, jumps: &'static [(isize, isize)], moves: &mut Vec<Move>) {
        let Some(piece) = self.get(m.from) else {
            return;
        };

        let report = self.apply_move(&m);
        moves.push(m);
        if report.promoted {
            debug!("{} man promoted on {} during a capture chain", piece.color.name(), m.to);
        }

        // Includes the capturing piece itself if it is, or just became, a king
        self.try_capture(piece.color, Rank::King, moves);

        let Some(square) = self.locate(piece.id()) else {
            return;
        };
        if let Some(next) = self.next_capture_with(square, jumps) {
            self.capture_chain(next, jumps, moves);
        }
    }

    fn next_capture_with(&self, square: Square, jumps: &[(isize, isize)]) -> Option<Move> {
        jumps
            .iter()
            .filter_map(|(dr, dc)| square.offset(*dr, *dc, self.size()))
            .find_map(|to| self.legal_move(square, to, CaptureState::MustContinue))
    }
}
