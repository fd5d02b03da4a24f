/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt::{self, Write};

use anyhow::{anyhow, bail, Context, Result};

use crate::{Config, Piece, PieceKind, Player, Square, MAX_BOARD_SIZE, MIN_BOARD_SIZE};

/// Contents of a single square: empty, or holding one [`Piece`].
pub type Cell = Option<Piece>;

/// An `N x N` grid of [`Cell`]s, addressed by [`Square`].
///
/// The board holds no rules of its own. All legality lives in [`crate::generate`] and [`crate::Session`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: u8,

    /// Row-major cells, `row * size + col`.
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board of `size x size` cells.
    ///
    /// `size` must be even and within [`MIN_BOARD_SIZE`] and [`MAX_BOARD_SIZE`].
    pub fn empty(size: u8) -> Result<Self> {
        if size % 2 != 0 || !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            bail!(
                "Board size must be an even number between {MIN_BOARD_SIZE} and {MAX_BOARD_SIZE}. Got {size}"
            );
        }

        let n = size as usize;
        Ok(Self {
            size,
            cells: vec![None; n * n],
        })
    }

    /// Creates a board in the starting setup described by `config`.
    ///
    /// Each player fills the dark squares of `config.rows_per_side` rows on its own side:
    /// [`Player::Second`] at the top (row `0` onward) and [`Player::First`] at the bottom.
    ///
    /// ```
    /// # use qorki::{Board, Config, Player};
    /// let board = Board::startpos(&Config::default()).unwrap();
    /// assert_eq!(board.count(Player::First), 12);
    /// assert_eq!(board.count(Player::Second), 12);
    /// ```
    pub fn startpos(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::setup(config.size, config.rows_per_side))
    }

    /// Fills the starting rows of an already-validated board shape.
    fn setup(size: u8, rows: u8) -> Self {
        let n = size as usize;
        let mut board = Self {
            size,
            cells: vec![None; n * n],
        };

        for row in 0..size {
            let player = if row < rows {
                Player::Second
            } else if row >= size - rows {
                Player::First
            } else {
                continue;
            };

            for col in 0..size {
                let square = Square::new(col, row);
                if square.is_dark() {
                    board.place(Piece::new(player, PieceKind::Man), square);
                }
            }
        }

        board
    }

    /// Number of rows (and columns) on this board.
    #[inline(always)]
    pub const fn size(&self) -> u8 {
        self.size
    }

    /// Returns `true` if `square` lies on this board.
    #[inline(always)]
    pub const fn contains(&self, square: Square) -> bool {
        square.col() < self.size && square.row() < self.size
    }

    /// Builds a [`Square`] from signed coordinates, if they lie on this board.
    ///
    /// ```
    /// # use qorki::{Board, Square};
    /// let board = Board::empty(8).unwrap();
    /// assert_eq!(board.square(7, 0), Some(Square::new(7, 0)));
    /// assert_eq!(board.square(8, 0), None);
    /// assert_eq!(board.square(-1, 3), None);
    /// ```
    pub fn square(&self, col: i32, row: i32) -> Option<Square> {
        Square::try_from((col, row))
            .ok()
            .filter(|&sq| self.contains(sq))
    }

    #[inline(always)]
    fn offset(&self, square: Square) -> usize {
        square.row() as usize * self.size as usize + square.col() as usize
    }

    /// Fetches the contents of `square`. Squares off the board are always empty.
    #[inline(always)]
    pub fn get(&self, square: Square) -> Cell {
        if self.contains(square) {
            self.cells[self.offset(square)]
        } else {
            None
        }
    }

    /// Overwrites the contents of `square`, returning what was there before.
    ///
    /// If `square` is not on the board, nothing happens and `None` is returned.
    #[inline(always)]
    pub fn set(&mut self, square: Square, cell: Cell) -> Option<Cell> {
        if !self.contains(square) {
            return None;
        }
        let idx = self.offset(square);
        Some(std::mem::replace(&mut self.cells[idx], cell))
    }

    /// Places `piece` on `square`.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.set(square, Some(piece));
    }

    /// Removes and returns the piece on `square`, if any.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.set(square, None).flatten()
    }

    /// Fetches the piece on `square`, if there is one.
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.get(square)
    }

    /// Iterates over every occupied square and its piece, row by row.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            let square = Square::new((i % size as usize) as u8, (i / size as usize) as u8);
            cell.map(|piece| (square, piece))
        })
    }

    /// Iterates over the squares of every piece owned by `player`.
    pub fn squares_of(&self, player: Player) -> impl Iterator<Item = Square> + '_ {
        self.pieces()
            .filter(move |(_, piece)| piece.player() == player)
            .map(|(square, _)| square)
    }

    /// Number of pieces owned by `player`.
    pub fn count(&self, player: Player) -> usize {
        self.squares_of(player).count()
    }

    /// Total number of pieces on the board.
    pub fn total(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    /// Parses the piece placement half of a layout string.
    ///
    /// Rows run from row `0` to the last row, separated by `/`.
    /// `x`/`X` are First's men/kings, `o`/`O` are Second's, and numbers are runs of empty cells.
    pub fn from_layout(placements: &str) -> Result<Self> {
        let rows = placements.trim().split('/').collect::<Vec<_>>();
        let size = u8::try_from(rows.len())
            .map_err(|_| anyhow!("Layout has too many rows ({})", rows.len()))?;
        let mut board = Self::empty(size).context("Invalid number of rows in layout")?;

        for (row, placement) in rows.into_iter().enumerate() {
            let mut col = 0usize;
            let mut run = 0usize;

            for c in placement.chars() {
                if let Some(digit) = c.to_digit(10) {
                    run = run.saturating_mul(10).saturating_add(digit as usize);
                    continue;
                }

                col += run;
                run = 0;

                let piece = Piece::from_char(c)
                    .with_context(|| format!("Invalid character in layout row {row}"))?;
                if col >= size as usize {
                    bail!("Layout row {row} ({placement:?}) is wider than {size} cells");
                }
                board.place(piece, Square::new(col as u8, row as u8));
                col += 1;
            }
            col += run;

            if col != size as usize {
                bail!("Layout row {row} ({placement:?}) spans {col} cells, but the board is {size} wide");
            }
        }

        Ok(board)
    }

    /// Generates the piece placement half of a layout string.
    ///
    /// ```
    /// # use qorki::{Board, Config};
    /// let board = Board::startpos(&Config::default()).unwrap();
    /// assert_eq!(board.to_layout(), "1o1o1o1o/o1o1o1o1/1o1o1o1o/8/8/x1x1x1x1/1x1x1x1x/x1x1x1x1");
    /// ```
    pub fn to_layout(&self) -> String {
        let mut rows = Vec::with_capacity(self.size as usize);

        for row in 0..self.size {
            let mut placement = String::new();
            let mut empty = 0;
            for col in 0..self.size {
                if let Some(piece) = self.get(Square::new(col, row)) {
                    if empty != 0 {
                        placement += &empty.to_string();
                        empty = 0;
                    }
                    placement.push(piece.char());
                } else {
                    empty += 1;
                }
            }
            if empty != 0 {
                placement += &empty.to_string();
            }
            rows.push(placement);
        }

        rows.join("/")
    }

    /// One string per row, one character per cell (`.` for empty).
    pub(crate) fn to_rows(&self) -> Vec<String> {
        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| {
                        self.get(Square::new(col, row))
                            .map(|p| p.char())
                            .unwrap_or('.')
                    })
                    .collect()
            })
            .collect()
    }

    /// Inverse of [`Board::to_rows`].
    pub(crate) fn from_rows(size: u8, rows: &[String]) -> Result<Self> {
        let mut board = Self::empty(size)?;
        if rows.len() != size as usize {
            bail!("Expected {size} rows, found {}", rows.len());
        }

        for (row, line) in rows.iter().enumerate() {
            let chars = line.chars().collect::<Vec<_>>();
            if chars.len() != size as usize {
                bail!(
                    "Row {row} has {} cells, but the board is {size} wide",
                    chars.len()
                );
            }
            for (col, c) in chars.into_iter().enumerate() {
                if c != '.' {
                    let piece = Piece::from_char(c)
                        .with_context(|| format!("Invalid cell at ({col},{row})"))?;
                    board.place(piece, Square::new(col as u8, row as u8));
                }
            }
        }

        Ok(board)
    }
}

impl Default for Board {
    /// Starting position for the default [`Config`].
    fn default() -> Self {
        let config = Config::default();
        Self::setup(config.size, config.rows_per_side)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board = String::with_capacity(self.cells.len() * 3);

        for row in 0..self.size {
            _ = write!(board, "{row:>2}|");
            for col in 0..self.size {
                let square = Square::new(col, row);
                let occupant = match self.get(square) {
                    Some(piece) => piece.char(),
                    None if square.is_dark() => '.',
                    None => ' ',
                };
                _ = write!(board, " {occupant}");
            }
            board += "\n";
        }

        board += "  +";
        for _ in 0..self.size {
            board += "--";
        }
        board += "\n   ";
        for col in 0..self.size {
            _ = write!(board, "{:>2}", col % 10);
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_layout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let board = Board::empty(8).unwrap();
        assert!(board.contains(Square::new(0, 0)));
        assert!(board.contains(Square::new(7, 7)));
        assert!(!board.contains(Square::new(8, 0)));
        assert!(!board.contains(Square::new(0, 8)));
        assert_eq!(board.get(Square::new(20, 20)), None);
    }

    #[test]
    fn test_set_out_of_bounds_is_ignored() {
        let mut board = Board::empty(8).unwrap();
        assert_eq!(board.set(Square::new(9, 1), Some(Piece::FIRST_MAN)), None);
        assert_eq!(board.total(), 0);

        assert_eq!(board.set(Square::new(1, 0), Some(Piece::FIRST_MAN)), Some(None));
        assert_eq!(
            board.set(Square::new(1, 0), None),
            Some(Some(Piece::FIRST_MAN))
        );
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(Board::empty(7).is_err());
        assert!(Board::empty(2).is_err());
        assert!(Board::empty(MAX_BOARD_SIZE + 2).is_err());
        assert!(Board::empty(10).is_ok());
    }

    #[test]
    fn test_startpos_only_uses_dark_squares() {
        let board = Board::default();
        assert_eq!(board.total(), 24);
        assert!(board.pieces().all(|(sq, _)| sq.is_dark()));

        for (sq, piece) in board.pieces() {
            match piece.player() {
                Player::First => assert!(sq.row() >= 5),
                Player::Second => assert!(sq.row() <= 2),
            }
        }
    }

    #[test]
    fn test_layout_round_trip() {
        let layout = "1o6/8/3X4/8/8/2o5/8/x7";
        let board = Board::from_layout(layout).unwrap();
        assert_eq!(board.to_layout(), layout);
        assert_eq!(board.get(Square::new(3, 2)), Some(Piece::FIRST_KING));
        assert_eq!(board.get(Square::new(0, 7)), Some(Piece::FIRST_MAN));
    }

    #[test]
    fn test_layout_multi_digit_runs() {
        let mut layout = vec!["10"; 10];
        layout[9] = "9x";
        let board = Board::from_layout(&layout.join("/")).unwrap();
        assert_eq!(board.size(), 10);
        assert_eq!(board.get(Square::new(9, 9)), Some(Piece::FIRST_MAN));
    }

    #[test]
    fn test_bad_layouts() {
        // Too wide
        assert!(Board::from_layout("9/8/8/8/8/8/8/8").is_err());
        // Too narrow
        assert!(Board::from_layout("7/8/8/8/8/8/8/8").is_err());
        // Odd number of rows
        assert!(Board::from_layout("7/7/7/7/7/7/7").is_err());
        // Unknown piece
        assert!(Board::from_layout("k7/8/8/8/8/8/8/8").is_err());
    }

    #[test]
    fn test_rows_round_trip() {
        let board = Board::default();
        let rows = board.to_rows();
        assert_eq!(rows[0], ".o.o.o.o");
        assert_eq!(Board::from_rows(8, &rows).unwrap(), board);

        assert!(Board::from_rows(8, &rows[1..]).is_err());
        assert!(Board::from_rows(6, &rows).is_err());
    }
}
