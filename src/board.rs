use std::fmt::{Debug, Display};

use log::{debug, error};
use tinyvec::TinyVec;

use crate::error::BoardError;

pub const DEFAULT_BOARD_SIZE: usize = 8;
pub const MIN_BOARD_SIZE: usize = 4;
pub const MAX_BOARD_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The human side. Starts on the bottom rows and moves up the board.
    #[default]
    Light,
    /// The computer side. Starts on the top rows and moves down the board.
    Dark,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Row delta of a forward step for a man of this color
    pub fn forward(self) -> isize {
        match self {
            Color::Light => -1,
            Color::Dark => 1,
        }
    }

    /// The opponent's back rank, where men of this color are promoted
    pub fn farthest_row(self, size: usize) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => size - 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Light => "Light",
            Color::Dark => "Dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rank {
    #[default]
    Man,
    King,
}

/// A checker. The cell holding it is its position; `id` orders the pieces of a side and survives promotion.
/// The id does not take part in equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct Piece {
    pub color: Color,
    pub rank: Rank,
    id: u32,
}

impl Piece {
    pub fn new(color: Color, rank: Rank) -> Piece {
        Piece { color, rank, id: 0 }
    }

    pub fn man(color: Color) -> Piece {
        Piece::new(color, Rank::Man)
    }

    pub fn king(color: Color) -> Piece {
        Piece::new(color, Rank::King)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }

    pub fn symbol(&self) -> char {
        match (self.color, self.rank) {
            (Color::Light, Rank::Man) => 'l',
            (Color::Light, Rank::King) => 'L',
            (Color::Dark, Rank::Man) => 'd',
            (Color::Dark, Rank::King) => 'D',
        }
    }

    pub fn from_symbol(c: char) -> Option<Piece> {
        match c {
            'l' => Some(Piece::man(Color::Light)),
            'L' => Some(Piece::king(Color::Light)),
            'd' => Some(Piece::man(Color::Dark)),
            'D' => Some(Piece::king(Color::Dark)),
            _ => None,
        }
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.color == other.color && self.rank == other.rank
    }
}

impl Eq for Piece {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    pub const fn new(row: usize, col: usize) -> Square {
        Square { row, col }
    }

    /// Returns the square `(dr, dc)` away, or None if that falls off a board of `size`
    pub fn offset(&self, dr: isize, dc: isize, size: usize) -> Option<Square> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        if row < size && col < size {
            Some(Square { row, col })
        } else {
            None
        }
    }

    pub fn row_delta(&self, to: Square) -> isize {
        to.row as isize - self.row as isize
    }

    pub fn col_delta(&self, to: Square) -> isize {
        to.col as isize - self.col as isize
    }

    /// The square jumped over by a two step diagonal move
    pub fn midpoint(&self, to: Square) -> Square {
        Square {
            row: (self.row + to.row) / 2,
            col: (self.col + to.col) / 2,
        }
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacedPiece {
    pub square: Square,
    pub piece: Piece,
}

/// Ordered view of one side's pieces
pub type PieceList = TinyVec<[PlacedPiece; 16]>;

/// Row-major snapshot of the cells, `grid[row][col]`
#[cfg_attr(not(test), allow(dead_code))]
pub type Grid = Vec<Vec<Option<Piece>>>;

#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Piece>>,
    next_id: u32,
}

impl Board {
    /// Board of `size` with both sides in their starting position
    pub fn new(size: usize) -> Result<Board, BoardError> {
        let mut board = Board::empty(size)?;

        // Each side fills the dark squares of the first size / 2 - 1 rows from its end
        let rows_per_side = size / 2 - 1;
        for row in 0..rows_per_side {
            for col in 0..size {
                if (row + col) % 2 == 1 {
                    board.place(Square::new(row, col), Piece::man(Color::Dark));
                }
            }
        }
        for row in (size - rows_per_side)..size {
            for col in 0..size {
                if (row + col) % 2 == 1 {
                    board.place(Square::new(row, col), Piece::man(Color::Light));
                }
            }
        }

        Ok(board)
    }

    pub fn empty(size: usize) -> Result<Board, BoardError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) || size % 2 != 0 {
            return Err(BoardError::UnsupportedSize(size));
        }

        Ok(Board {
            size,
            cells: vec![None; size * size],
            next_id: 0,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Bounds check for untrusted coordinates. Must pass before any query.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    #[inline]
    fn index(&self, square: Square) -> usize {
        if !self.contains(square.row, square.col) {
            error!("Square {square} is outside of the {0}x{0} board", self.size);
            panic!("Square {square} is outside of the board");
        }
        square.row * self.size + square.col
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.cells[self.index(square)]
    }

    pub fn is_empty_square(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    /// Puts a new piece at the end of its side's ordering. Men already on their farthest row are kings.
    fn place(&mut self, square: Square, mut piece: Piece) {
        let index = self.index(square);
        if self.cells[index].is_some() {
            error!("Tried to place {piece:?} on occupied square {square}");
            panic!("Tried to place a piece on an occupied square");
        }

        if piece.rank == Rank::Man && square.row == piece.color.farthest_row(self.size) {
            debug!("Placing {} man on its farthest row at {square}, it starts as a king", piece.color.name());
            piece.rank = Rank::King;
        }

        piece.id = self.next_id;
        self.next_id += 1;
        self.cells[index] = Some(piece);
    }

    /// Relocates the piece on `from` to `to`. Does not check legality.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        let from_index = self.index(from);
        let to_index = self.index(to);

        let Some(piece) = self.cells[from_index] else {
            error!("Tried to move from empty square {from} to {to}. {self:?}");
            panic!("Tried to move a piece from an empty square");
        };
        if let Some(occupant) = self.cells[to_index] {
            error!("Tried to move {piece:?} from {from} onto {occupant:?} at {to}. {self:?}");
            panic!("Tried to move a piece onto an occupied square");
        }

        self.cells[to_index] = Some(piece);
        self.cells[from_index] = None;
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let index = self.index(square);
        self.cells[index].take()
    }

    /// Makes the piece on `square` a king if it stands on its color's farthest row.
    /// Returns true only when the rank actually changed.
    pub fn promote_if_farthest(&mut self, square: Square) -> bool {
        let index = self.index(square);
        let size = self.size;
        match self.cells[index].as_mut() {
            Some(piece) if piece.rank == Rank::Man && square.row == piece.color.farthest_row(size) => {
                piece.rank = Rank::King;
                true
            }
            _ => false,
        }
    }

    /// The pieces of `color` in side order
    pub fn side_pieces(&self, color: Color) -> PieceList {
        let mut pieces: PieceList = self
            .cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| match cell {
                Some(piece) if piece.color == color => Some(PlacedPiece {
                    square: Square::new(i / self.size, i % self.size),
                    piece: *piece,
                }),
                _ => None,
            })
            .collect();
        pieces.sort_by_key(|p| p.piece.id);
        pieces
    }

    /// The kings of `color` in side order. Always reflects promotions made so far.
    pub fn king_pieces(&self, color: Color) -> PieceList {
        let mut pieces = self.side_pieces(color);
        pieces.retain(|p| p.piece.is_king());
        pieces
    }

    pub fn piece_count(&self, color: Color) -> usize {
        self.cells.iter().flatten().filter(|p| p.color == color).count()
    }

    pub fn locate(&self, id: u32) -> Option<Square> {
        self.cells
            .iter()
            .position(|cell| cell.is_some_and(|p| p.id == id))
            .map(|i| Square::new(i / self.size, i % self.size))
    }

    /// Replaces every piece of `color` with `pieces`, ordered as given. The board is unchanged on error.
    /// Along with the raw grid pair this is how scenarios get injected, so only tests call it.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set_side_pieces(&mut self, color: Color, pieces: &[(Square, Rank)]) -> Result<(), BoardError> {
        let mut replacement = self.clone();
        for cell in replacement.cells.iter_mut() {
            if cell.is_some_and(|p| p.color == color) {
                *cell = None;
            }
        }

        for (square, rank) in pieces {
            if !replacement.contains(square.row, square.col) {
                return Err(BoardError::OutOfBounds {
                    row: square.row,
                    col: square.col,
                });
            }
            if !replacement.is_empty_square(*square) {
                return Err(BoardError::Occupied {
                    row: square.row,
                    col: square.col,
                });
            }
            replacement.place(*square, Piece::new(color, *rank));
        }

        *self = replacement;
        Ok(())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn raw_grid(&self) -> Grid {
        self.cells.chunks_exact(self.size).map(|row| row.to_vec()).collect()
    }

    /// Replaces the whole board. Pieces keep the relative order they had in `grid`, ties broken row-major.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set_raw_grid(&mut self, grid: Grid) -> Result<(), BoardError> {
        if grid.len() != self.size {
            return Err(BoardError::RowCount {
                expected: self.size,
                actual: grid.len(),
            });
        }
        if let Some((row, cells)) = grid.iter().enumerate().find(|(_, cells)| cells.len() != self.size) {
            return Err(BoardError::RowWidth {
                row,
                expected: self.size,
                actual: cells.len(),
            });
        }

        let mut placed: Vec<(Square, Piece)> = grid
            .into_iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .into_iter()
                    .enumerate()
                    .filter_map(move |(col, cell)| cell.map(|p| (Square::new(row, col), p)))
            })
            .collect();
        placed.sort_by_key(|(_, p)| p.id);

        self.cells = vec![None; self.size * self.size];
        self.next_id = 0;
        for (square, piece) in placed {
            self.place(square, Piece::new(piece.color, piece.rank));
        }

        Ok(())
    }

    /// Parses a diagram: rows from row 0 down separated by '/', `l`/`L` light man/king, `d`/`D` dark man/king,
    /// numbers for runs of empty squares. The board size is the number of rows.
    pub fn from_diagram(diagram: &str) -> Result<Board, BoardError> {
        let rows: Vec<&str> = diagram.trim().split('/').collect();
        let mut board = Board::empty(rows.len())?;
        let size = board.size;

        for (row, text) in rows.iter().enumerate() {
            let mut col: usize = 0;
            let mut empty_run: usize = 0;
            for c in text.chars() {
                if let Some(digit) = c.to_digit(10) {
                    empty_run = empty_run.saturating_mul(10).saturating_add(digit as usize);
                    if col.saturating_add(empty_run) > size {
                        return Err(BoardError::RowWidth {
                            row,
                            expected: size,
                            actual: col.saturating_add(empty_run),
                        });
                    }
                    continue;
                }

                col += empty_run;
                empty_run = 0;

                let Some(piece) = Piece::from_symbol(c) else {
                    return Err(BoardError::UnexpectedChar(c));
                };
                if col >= size {
                    return Err(BoardError::RowWidth {
                        row,
                        expected: size,
                        actual: col + 1,
                    });
                }
                board.place(Square::new(row, col), piece);
                col += 1;
            }
            col += empty_run;

            if col != size {
                return Err(BoardError::RowWidth {
                    row,
                    expected: size,
                    actual: col,
                });
            }
        }

        Ok(board)
    }

    pub fn to_diagram(&self) -> String {
        self.cells
            .chunks_exact(self.size)
            .map(|cells| {
                let mut text = String::new();
                let mut empty_run = 0;
                for cell in cells {
                    match cell {
                        Some(piece) => {
                            if empty_run > 0 {
                                text.push_str(&empty_run.to_string());
                                empty_run = 0;
                            }
                            text.push(piece.symbol());
                        }
                        None => empty_run += 1,
                    }
                }
                if empty_run > 0 {
                    text.push_str(&empty_run.to_string());
                }
                text
            })
            .collect::<Vec<String>>()
            .join("/")
    }
}

impl Default for Board {
    fn default() -> Self {
        // The default size is always supported
        Board::new(DEFAULT_BOARD_SIZE).unwrap()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.size {
            write!(f, "{col:>2}")?;
        }
        writeln!(f)?;

        for (row, cells) in self.cells.chunks_exact(self.size).enumerate() {
            write!(f, "{row:>2} ")?;
            for cell in cells {
                let c = cell.map_or('.', |p| p.symbol());
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("size", &self.size)
            .field("diagram", &self.to_diagram())
            .finish()?;

        write!(f, "\n{self}")
    }
}
