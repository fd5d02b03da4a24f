/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::Direction;

/// One of the two sides of the game.
///
/// [`Player::First`] moves first, starts on the highest rows of the board, and advances toward row `0`.
/// [`Player::Second`] starts on rows `0..` and advances toward the last row.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    #[default]
    First,
    Second,
}

impl Player {
    /// Number of player variants.
    pub const COUNT: usize = 2;

    /// An array of both players, starting with First.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::First, Self::Second]
    }

    /// Returns this [`Player`]'s opponent.
    ///
    /// # Example
    /// ```
    /// # use qorki::Player;
    /// assert_eq!(Player::First.opponent(), Player::Second);
    /// assert_eq!(Player::Second.opponent(), Player::First);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Returns this [`Player`] as a `usize`, for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// The two diagonals a man of this player may move along, toward higher columns first.
    #[inline(always)]
    pub const fn forward_directions(&self) -> [Direction; 2] {
        match self {
            Self::First => [Direction::UP_RIGHT, Direction::UP_LEFT],
            Self::Second => [Direction::DOWN_RIGHT, Direction::DOWN_LEFT],
        }
    }

    /// The row on which this player's men are promoted, on a board of `size` rows.
    ///
    /// ```
    /// # use qorki::Player;
    /// assert_eq!(Player::First.promotion_row(8), 0);
    /// assert_eq!(Player::Second.promotion_row(8), 7);
    /// ```
    #[inline(always)]
    pub const fn promotion_row(&self, size: u8) -> u8 {
        match self {
            Self::First => 0,
            Self::Second => size - 1,
        }
    }

    /// Character used for this player's men in layout strings.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::First => 'x',
            Self::Second => 'o',
        }
    }

    /// Parses a player from its layout character (case-insensitive).
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'x' | 'X' => Ok(Self::First),
            'o' | 'O' => Ok(Self::Second),
            _ => bail!("Player must be either 'x' or 'o' (case-insensitive). Found {c:?}"),
        }
    }

    /// Human-readable name for this player.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::First => "Player 1",
            Self::Second => "Player 2",
        }
    }
}

impl FromStr for Player {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "first" => Ok(Self::First),
            "2" | "second" => Ok(Self::Second),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::from_char(c),
                    _ => bail!("Invalid player {s:?}"),
                }
            }
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "First"),
            Self::Second => write!(f, "Second"),
        }
    }
}

impl<T> Index<Player> for [T; Player::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Player) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Player> for [T; Player::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Player) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

/// The rank of a piece: men step forward, kings fly along any diagonal.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum PieceKind {
    #[default]
    Man,
    King,
}

/// A piece on the board: who owns it and whether it has been crowned.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    player: Player,
    kind: PieceKind,
}

impl Piece {
    pub const FIRST_MAN: Self = Self::new(Player::First, PieceKind::Man);
    pub const FIRST_KING: Self = Self::new(Player::First, PieceKind::King);
    pub const SECOND_MAN: Self = Self::new(Player::Second, PieceKind::Man);
    pub const SECOND_KING: Self = Self::new(Player::Second, PieceKind::King);

    #[inline(always)]
    pub const fn new(player: Player, kind: PieceKind) -> Self {
        Self { player, kind }
    }

    #[inline(always)]
    pub const fn player(&self) -> Player {
        self.player
    }

    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    /// Returns a copy of this piece, crowned.
    #[inline(always)]
    pub const fn promoted(self) -> Self {
        Self::new(self.player, PieceKind::King)
    }

    /// Layout character: lowercase for men, uppercase for kings.
    ///
    /// ```
    /// # use qorki::Piece;
    /// assert_eq!(Piece::FIRST_MAN.char(), 'x');
    /// assert_eq!(Piece::SECOND_KING.char(), 'O');
    /// ```
    #[inline(always)]
    pub const fn char(&self) -> char {
        let c = self.player.char();
        match self.kind {
            PieceKind::Man => c,
            PieceKind::King => c.to_ascii_uppercase(),
        }
    }

    /// Parses a piece from its layout character.
    pub fn from_char(c: char) -> Result<Self> {
        let player = Player::from_char(c)?;
        let kind = if c.is_ascii_uppercase() {
            PieceKind::King
        } else {
            PieceKind::Man
        };
        Ok(Self::new(player, kind))
    }
}

impl FromStr for Piece {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => bail!("Piece must be a single character (x, X, o, O). Got {s:?}"),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.player, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_chars() {
        for piece in [
            Piece::FIRST_MAN,
            Piece::FIRST_KING,
            Piece::SECOND_MAN,
            Piece::SECOND_KING,
        ] {
            assert_eq!(Piece::from_char(piece.char()).unwrap(), piece);
        }

        assert!(Piece::from_char('k').is_err());
        assert!("xo".parse::<Piece>().is_err());
    }

    #[test]
    fn test_player_indexing() {
        let mut scores = [0u32; Player::COUNT];
        scores[Player::Second] += 3;
        assert_eq!(scores[Player::First], 0);
        assert_eq!(scores[1], 3);
    }

    #[test]
    fn test_promotion_is_stable() {
        assert_eq!(Piece::FIRST_MAN.promoted(), Piece::FIRST_KING);
        assert_eq!(Piece::FIRST_KING.promoted(), Piece::FIRST_KING);
    }
}
