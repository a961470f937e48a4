use std::{io::Write, sync::LazyLock};

use log::{debug, error, trace};
use regex::Regex;

use crate::{
    board::{Board, Square},
    computer::ComputerTurn,
    config::EngineConfig,
    error::CommandError,
    game::{COMPUTER_COLOR, DefeatReason, Game, HUMAN_COLOR},
    human_turn::{HumanTurnState, MoveOutcome},
    moves::CaptureState,
};

static SQUARE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*[,\s]\s*(\d+)\s*$").expect("square pattern is valid"));

const HELP: &str = "\
commands:
  new                  start a new game
  show                 print the board
  moves                list your legal moves
  select <row> <col>   pick one of your pieces
  move <row> <col>     move the selected piece there, '<row>,<col>' also works
  pass                 end your turn after a capture
  position <diagram>   set up a position, e.g. 8/8/8/3d4/4l3/8/8/8
  diagram              print the current position as a diagram
  help                 show this message
  quit                 leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    Quit,
}

/// Line based front end. You play light from the bottom of the board, the computer plays dark.
pub struct ConsoleInterface {
    config: EngineConfig,
    game: Game,
    banner: String,
}

impl ConsoleInterface {
    pub fn new(config: EngineConfig, banner: String) -> Result<ConsoleInterface, CommandError> {
        let game = Game::new(&config)?;
        Ok(ConsoleInterface { config, game, banner })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn process_command(&mut self, line: &str, out: &mut impl Write) -> Result<CommandResult, CommandError> {
        debug!("Received console line '{line}'");
        let line = line.trim();
        let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        match cmd {
            "" => {}
            "new" => {
                self.game = Game::new(&self.config)?;
                writeln!(out, "{}", self.game.board())?;
            }
            "show" => self.show(out)?,
            "moves" => {
                let turn = self.game.human_turn();
                let moves = turn.available_moves(self.game.board());
                let label = match turn.capture_state() {
                    CaptureState::MustContinue => "captures",
                    CaptureState::Open => "moves",
                };
                if moves.is_empty() {
                    writeln!(out, "no {label} available")?;
                } else {
                    writeln!(
                        out,
                        "{label}: {}",
                        moves.iter().map(|m| m.to_string()).collect::<Vec<String>>().join(" ")
                    )?;
                }
            }
            "diagram" => writeln!(out, "{}", self.game.board().to_diagram())?,
            "select" => {
                let square = self.parse_square(rest)?;
                if self.game.select(square) {
                    writeln!(out, "selected {square}")?;
                } else {
                    writeln!(out, "cannot select {square}")?;
                }
            }
            "move" => {
                let square = self.parse_square(rest)?;
                self.make_move(square, out)?;
            }
            "pass" => match self.game.end_human_turn() {
                Some(turn) => self.report_computer_turn(&turn, out)?,
                None => writeln!(out, "nothing to pass, you have not captured this turn")?,
            },
            "position" => {
                let board = Board::from_diagram(rest)?;
                self.game = Game::from_board(board, self.config.auto_end_capture_chain);
                writeln!(out, "{}", self.game.board())?;
                self.report_outcome(out)?;
            }
            "help" => writeln!(out, "{}\n{HELP}", self.banner)?,
            "quit" | "exit" => return Ok(CommandResult::Quit),
            _ => {
                // Bare coordinates are a move
                if SQUARE_REGEX.is_match(line) {
                    let square = self.parse_square(line)?;
                    self.make_move(square, out)?;
                } else {
                    error!("Unknown console command '{line}'");
                    return Err(CommandError::Unknown(cmd.to_string()));
                }
            }
        }

        Ok(CommandResult::Continue)
    }

    /// Reads `<row> <col>` or `<row>,<col>` and rejects squares off the board
    fn parse_square(&self, text: &str) -> Result<Square, CommandError> {
        let Some(caps) = SQUARE_REGEX.captures(text) else {
            return Err(CommandError::BadSquare(text.to_string()));
        };
        let row: usize = caps[1].parse().map_err(|_| CommandError::BadSquare(text.to_string()))?;
        let col: usize = caps[2].parse().map_err(|_| CommandError::BadSquare(text.to_string()))?;

        if !self.game.board().contains(row, col) {
            return Err(CommandError::OutOfBounds { row, col });
        }

        trace!("Parsed square ({row}, {col}) from '{text}'");
        Ok(Square::new(row, col))
    }

    fn make_move(&mut self, dest: Square, out: &mut impl Write) -> Result<(), CommandError> {
        let report = self.game.attempt_human_move(dest);
        match report.human {
            MoveOutcome::NoMove => {
                if self.game.is_over() {
                    self.report_outcome(out)?;
                } else {
                    writeln!(out, "illegal move")?;
                }
                return Ok(());
            }
            MoveOutcome::CaptureContinues if report.computer.is_none() && !self.game.is_over() => {
                writeln!(out, "captured, keep capturing with {dest} or pass")?;
                return Ok(());
            }
            MoveOutcome::CaptureContinues | MoveOutcome::TurnComplete => {}
        }

        match report.computer {
            Some(turn) => self.report_computer_turn(&turn, out),
            None => {
                self.print_board(out)?;
                self.report_outcome(out)
            }
        }
    }

    fn report_computer_turn(&self, turn: &ComputerTurn, out: &mut impl Write) -> Result<(), CommandError> {
        match turn {
            ComputerTurn::Moved(moves) => writeln!(
                out,
                "computer plays {}",
                moves.iter().map(|m| m.to_string()).collect::<Vec<String>>().join(" ")
            )?,
            ComputerTurn::NoLegalMove => writeln!(out, "computer has no legal move")?,
        }

        self.print_board(out)?;
        self.report_outcome(out)
    }

    fn show(&self, out: &mut impl Write) -> Result<(), CommandError> {
        let board = self.game.board();
        writeln!(out, "{board}")?;
        writeln!(
            out,
            "{} {}, {} {}",
            HUMAN_COLOR.name(),
            board.piece_count(HUMAN_COLOR),
            COMPUTER_COLOR.name(),
            board.piece_count(COMPUTER_COLOR)
        )?;
        match self.game.human_turn().state() {
            HumanTurnState::Idle => {}
            HumanTurnState::Selected(square) => writeln!(out, "selected {square}")?,
            HumanTurnState::ForcedContinuation(square) => writeln!(out, "keep capturing with {square} or pass")?,
        }
        self.report_outcome(out)
    }

    fn print_board(&self, out: &mut impl Write) -> Result<(), CommandError> {
        if self.config.print_board {
            writeln!(out, "{}", self.game.board())?;
        }
        Ok(())
    }

    fn report_outcome(&self, out: &mut impl Write) -> Result<(), CommandError> {
        if let Some(outcome) = self.game.outcome() {
            let how = match outcome.reason {
                DefeatReason::AllCaptured => "took every piece",
                DefeatReason::Blocked => "left the other side without a move",
            };
            writeln!(out, "game over, {} {how}", outcome.winner.name())?;
        }
        Ok(())
    }
}
