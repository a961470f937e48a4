use log::info;

use crate::{
    board::{Board, Color, PlacedPiece, Square},
    computer::ComputerTurn,
    config::EngineConfig,
    error::BoardError,
    human_turn::{HumanTurn, MoveOutcome},
};

pub const HUMAN_COLOR: Color = Color::Light;
pub const COMPUTER_COLOR: Color = Color::Dark;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefeatReason {
    AllCaptured,
    /// The side to move had no legal move
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Color,
    pub reason: DefeatReason,
}

/// A side is defeated once it has no pieces left
pub fn is_side_defeated(pieces: &[PlacedPiece]) -> bool {
    pieces.is_empty()
}

/// What happened after the player picked a destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub human: MoveOutcome,
    /// Set when the human turn finished and the computer replied
    pub computer: Option<ComputerTurn>,
}

/// Alternates the human and computer turns on one board and decides when the game is over
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    human: HumanTurn,
    auto_end_capture_chain: bool,
    outcome: Option<GameOutcome>,
}

impl Game {
    pub fn new(config: &EngineConfig) -> Result<Game, BoardError> {
        let board = Board::new(config.board_size)?;
        Ok(Game::from_board(board, config.auto_end_capture_chain))
    }

    /// Starts from an arbitrary position with the human to move
    pub fn from_board(board: Board, auto_end_capture_chain: bool) -> Game {
        let mut game = Game {
            board,
            human: HumanTurn::new(HUMAN_COLOR),
            auto_end_capture_chain,
            outcome: None,
        };
        game.evaluate(HUMAN_COLOR);
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn human_turn(&self) -> &HumanTurn {
        &self.human
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn select(&mut self, square: Square) -> bool {
        !self.is_over() && self.human.select(&self.board, square)
    }

    /// Tries to move the selected piece to `dest`. When that ends the human turn the computer replies
    /// straight away.
    pub fn attempt_human_move(&mut self, dest: Square) -> TurnReport {
        if self.is_over() {
            return TurnReport {
                human: MoveOutcome::NoMove,
                computer: None,
            };
        }

        let selected = self.human.selected();
        let outcome = self.human.attempt_move(&mut self.board, dest, selected);
        let turn_over = match outcome {
            MoveOutcome::NoMove => false,
            MoveOutcome::TurnComplete => true,
            MoveOutcome::CaptureContinues => {
                // Nothing left to capture also ends a chain that would otherwise wait for a pass
                let computer_defeated = is_side_defeated(&self.board.side_pieces(COMPUTER_COLOR));
                if computer_defeated || (self.auto_end_capture_chain && self.human.chain_exhausted(&self.board)) {
                    self.human.end_turn()
                } else {
                    false
                }
            }
        };

        TurnReport {
            human: outcome,
            computer: if turn_over { self.finish_human_turn() } else { None },
        }
    }

    /// Hands the turn over after a capture without taking any further pieces
    pub fn end_human_turn(&mut self) -> Option<ComputerTurn> {
        if self.is_over() || !self.human.end_turn() {
            return None;
        }

        self.finish_human_turn()
    }

    fn finish_human_turn(&mut self) -> Option<ComputerTurn> {
        if self.evaluate(COMPUTER_COLOR) {
            return None;
        }

        let turn = self.board.computer_move(COMPUTER_COLOR);
        self.evaluate(HUMAN_COLOR);
        Some(turn)
    }

    /// Checks for game over with `to_move` about to play. Returns true if the game is over.
    fn evaluate(&mut self, to_move: Color) -> bool {
        if self.outcome.is_some() {
            return true;
        }

        for color in [HUMAN_COLOR, COMPUTER_COLOR] {
            if is_side_defeated(&self.board.side_pieces(color)) {
                self.outcome = Some(GameOutcome {
                    winner: color.opponent(),
                    reason: DefeatReason::AllCaptured,
                });
            }
        }

        if self.outcome.is_none() && !self.board.has_any_legal_move(to_move) {
            self.outcome = Some(GameOutcome {
                winner: to_move.opponent(),
                reason: DefeatReason::Blocked,
            });
        }

        if let Some(outcome) = self.outcome {
            info!("Game over, {} wins ({:?})", outcome.winner.name(), outcome.reason);
        }

        self.outcome.is_some()
    }
}
