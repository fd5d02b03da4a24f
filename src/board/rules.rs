/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{has_any_move, Board, Player, Square};

/// Result of evaluating a position for the player to move.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Ongoing,
    Win(Player),
}

impl Outcome {
    /// Returns `true` if the game has been decided.
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::Win(_))
    }

    /// The winning player, if any.
    #[inline(always)]
    pub const fn winner(&self) -> Option<Player> {
        match self {
            Self::Win(player) => Some(*player),
            Self::Ongoing => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Win(player) => write!(f, "{player} wins!"),
        }
    }
}

/// Crowns the man on `square` if it belongs to `player` and stands on that player's far row.
///
/// Returns `true` if a promotion happened. Kings, empty squares, and the opponent's men are left alone.
///
/// ```
/// # use qorki::{maybe_promote, Board, Piece, Player, Square};
/// let mut board = Board::empty(8).unwrap();
/// let sq = Square::new(3, 0);
/// board.place(Piece::FIRST_MAN, sq);
///
/// assert!(maybe_promote(&mut board, sq, Player::First));
/// assert_eq!(board.piece_at(sq), Some(Piece::FIRST_KING));
///
/// // Promoting a king again changes nothing
/// assert!(!maybe_promote(&mut board, sq, Player::First));
/// ```
pub fn maybe_promote(board: &mut Board, square: Square, player: Player) -> bool {
    let Some(piece) = board.piece_at(square) else {
        return false;
    };

    if piece.player() != player
        || piece.is_king()
        || square.row() != player.promotion_row(board.size())
    {
        return false;
    }

    board.place(piece.promoted(), square);
    true
}

/// Decides whether the game is over, with `to_move` being the player whose turn it is.
///
/// A player with no pieces left loses. Otherwise, if `to_move` has no legal move for any of its pieces, it loses.
/// Nothing is cached: the board is inspected in full on every call.
pub fn evaluate(board: &Board, to_move: Player) -> Outcome {
    for player in Player::all() {
        if board.count(player) == 0 {
            return Outcome::Win(player.opponent());
        }
    }

    if !has_any_move(board, to_move) {
        return Outcome::Win(to_move.opponent());
    }

    Outcome::Ongoing
}
