/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

/// A single cell on the board, addressed by logical `(column, row)`.
///
/// A [`Square`] knows nothing about the size of the board it lives on.
/// Use [`crate::Board::contains`] or [`crate::Board::square`] to check whether it is in bounds.
///
/// Squares are displayed as `(col,row)` and can be parsed from either `col,row` or `(col,row)`:
/// ```
/// # use qorki::Square;
/// let sq: Square = "3,4".parse().unwrap();
/// assert_eq!(sq, Square::new(3, 4));
/// assert_eq!(sq.to_string(), "(3,4)");
/// assert_eq!("(3,4)".parse::<Square>().unwrap(), sq);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Square {
    col: u8,
    row: u8,
}

impl Square {
    /// Creates a new [`Square`] at `(col, row)`.
    #[inline(always)]
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// The column (horizontal component) of this square.
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.col
    }

    /// The row (vertical component) of this square.
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.row
    }

    /// Returns `true` if this square lies on the playable diagonal set, where `col + row` is odd.
    ///
    /// ```
    /// # use qorki::Square;
    /// assert!(Square::new(1, 0).is_dark());
    /// assert!(!Square::new(0, 0).is_dark());
    /// ```
    #[inline(always)]
    pub const fn is_dark(&self) -> bool {
        (self.col ^ self.row) & 1 == 1
    }

    /// Steps `distance` cells away from this square in `direction`.
    ///
    /// Yields `None` if either coordinate would become negative or overflow.
    /// The result is *not* checked against any board's size.
    #[inline(always)]
    pub fn offset(&self, direction: Direction, distance: u8) -> Option<Self> {
        let dist = distance as i8;
        let col = self.col.checked_add_signed(direction.dx.checked_mul(dist)?)?;
        let row = self.row.checked_add_signed(direction.dy.checked_mul(dist)?)?;
        Some(Self::new(col, row))
    }

    /// Steps a single cell in `direction`.
    #[inline(always)]
    pub fn step(&self, direction: Direction) -> Option<Self> {
        self.offset(direction, 1)
    }

    /// Number of diagonal steps between `self` and `other`, if they share a diagonal.
    ///
    /// ```
    /// # use qorki::Square;
    /// assert_eq!(Square::new(1, 6).diagonal_distance(Square::new(3, 4)), Some(2));
    /// assert_eq!(Square::new(1, 6).diagonal_distance(Square::new(1, 4)), None);
    /// ```
    pub fn diagonal_distance(&self, other: Self) -> Option<u8> {
        let dc = self.col.abs_diff(other.col);
        let dr = self.row.abs_diff(other.row);
        (dc == dr).then_some(dc)
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    /// Parses `col,row`, optionally wrapped in parentheses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (col, row) = trimmed
            .split_once(',')
            .ok_or(anyhow!("Square must be of the form `col,row`. Got {s:?}"))?;

        let col = col
            .trim()
            .parse::<u8>()
            .with_context(|| format!("Invalid column in square {s:?}"))?;
        let row = row
            .trim()
            .parse::<u8>()
            .with_context(|| format!("Invalid row in square {s:?}"))?;

        Ok(Self::new(col, row))
    }
}

impl TryFrom<(i32, i32)> for Square {
    type Error = anyhow::Error;
    /// Converts a signed coordinate pair, as produced by a pixel-mapping front end.
    fn try_from((col, row): (i32, i32)) -> Result<Self, Self::Error> {
        let (Ok(c), Ok(r)) = (u8::try_from(col), u8::try_from(row)) else {
            bail!("Coordinates ({col},{row}) cannot name a square");
        };
        Ok(Self::new(c, r))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A diagonal direction of travel, as a pair of unit steps.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Direction {
    dx: i8,
    dy: i8,
}

impl Direction {
    /// Toward higher columns and higher rows.
    pub const DOWN_RIGHT: Self = Self::new(1, 1);
    /// Toward lower columns and higher rows.
    pub const DOWN_LEFT: Self = Self::new(-1, 1);
    /// Toward higher columns and lower rows.
    pub const UP_RIGHT: Self = Self::new(1, -1);
    /// Toward lower columns and lower rows.
    pub const UP_LEFT: Self = Self::new(-1, -1);

    /// All four diagonals, in the order kings scan them.
    pub const ALL: [Self; 4] = [
        Self::DOWN_RIGHT,
        Self::DOWN_LEFT,
        Self::UP_RIGHT,
        Self::UP_LEFT,
    ];

    #[inline(always)]
    const fn new(dx: i8, dy: i8) -> Self {
        Self { dx, dy }
    }
}
