/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref};

use arrayvec::ArrayVec;

use crate::{Board, Direction, Piece, Player, Square, MAX_BOARD_SIZE};

/// Maximum number of destinations a single piece can ever have.
///
/// A king on the longest pair of diagonals through one cell reaches every other cell on them,
/// which is `(N - 1) + (N - 2)` cells on an `N x N` board.
pub const MAX_CANDIDATES: usize = 2 * MAX_BOARD_SIZE as usize - 3;

/// A destination reachable by the selected piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    to: Square,

    /// The opponent piece this move jumps, if it is a capture.
    captured: Option<Square>,
}

impl Candidate {
    /// A move onto an empty square, removing nothing.
    #[inline(always)]
    pub const fn quiet(to: Square) -> Self {
        Self { to, captured: None }
    }

    /// A move onto `to` that jumps and removes the piece on `captured`.
    #[inline(always)]
    pub const fn capture(to: Square, captured: Square) -> Self {
        Self {
            to,
            captured: Some(captured),
        }
    }

    /// Landing square.
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Square of the jumped piece, if this is a capture.
    #[inline(always)]
    pub const fn captured(&self) -> Option<Square> {
        self.captured
    }

    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to)
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.captured {
            Some(captured) => write!(f, "{} x{captured}", self.to),
            None => write!(f, "{}", self.to),
        }
    }
}

/// An ordered, bounded list of [`Candidate`]s.
///
/// Pushing past [`MAX_CANDIDATES`] drops the candidate and raises the [`CandidateList::is_truncated`] flag.
/// Board sizes are capped so that this never happens in a real game.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    moves: ArrayVec<Candidate, MAX_CANDIDATES>,
    truncated: bool,
}

impl CandidateList {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `candidate`, flagging the list as truncated if it is already full.
    pub fn push(&mut self, candidate: Candidate) {
        if self.moves.try_push(candidate).is_err() {
            log::warn!("Candidate list is full; dropping {candidate:?}");
            self.truncated = true;
        }
    }

    /// Returns `true` if a candidate was ever dropped for lack of capacity.
    #[inline(always)]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Finds the candidate landing on `to`, if there is one.
    pub fn find(&self, to: Square) -> Option<Candidate> {
        self.moves.iter().copied().find(|c| c.to == to)
    }

    /// Returns `true` if any candidate is a capture.
    pub fn has_capture(&self) -> bool {
        self.moves.iter().any(Candidate::is_capture)
    }

    /// Empties the list and resets the truncation flag.
    pub fn clear(&mut self) {
        self.moves.clear();
        self.truncated = false;
    }
}

impl Deref for CandidateList {
    type Target = [Candidate];
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.moves
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;
    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl fmt::Debug for CandidateList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.moves.iter()).finish()?;
        if self.truncated {
            write!(f, " (truncated)")?;
        }
        Ok(())
    }
}

/// Generates every destination for the piece on `from`.
///
/// If `after_capture` is set, this is the continuation of a capture chain and only captures are produced.
/// An empty or off-board `from` yields no candidates.
///
/// Men step one cell along their two forward diagonals, or jump an adjacent opponent onto the empty cell behind it.
/// Kings fly any distance along all four diagonals, and capture by jumping the first opponent piece in a direction,
/// landing on the cell immediately after it.
///
/// ```
/// # use qorki::{generate, Board, Piece, Square};
/// let mut board = Board::empty(8).unwrap();
/// board.place(Piece::FIRST_MAN, Square::new(1, 6));
/// board.place(Piece::SECOND_MAN, Square::new(2, 5));
///
/// let moves = generate(&board, Square::new(1, 6), false);
/// let capture = moves.find(Square::new(3, 4)).unwrap();
/// assert_eq!(capture.captured(), Some(Square::new(2, 5)));
///
/// // Once a capture has been made, only further captures are offered
/// let moves = generate(&board, Square::new(1, 6), true);
/// assert_eq!(moves.len(), 1);
/// ```
pub fn generate(board: &Board, from: Square, after_capture: bool) -> CandidateList {
    let mut list = CandidateList::new();
    let Some(piece) = board.piece_at(from) else {
        return list;
    };

    if piece.is_king() {
        generate_king(board, from, piece, after_capture, &mut list);
    } else {
        generate_man(board, from, piece, after_capture, &mut list);
    }

    list
}

fn generate_man(
    board: &Board,
    from: Square,
    piece: Piece,
    after_capture: bool,
    list: &mut CandidateList,
) {
    for dir in piece.player().forward_directions() {
        let Some(adjacent) = from.step(dir).filter(|&sq| board.contains(sq)) else {
            continue;
        };

        match board.piece_at(adjacent) {
            None if !after_capture => list.push(Candidate::quiet(adjacent)),
            None => {}
            Some(other) if other.player() != piece.player() => {
                let landing = adjacent.step(dir).filter(|&sq| board.contains(sq));
                if let Some(landing) = landing.filter(|&sq| board.piece_at(sq).is_none()) {
                    list.push(Candidate::capture(landing, adjacent));
                }
            }
            Some(_) => {}
        }
    }
}

fn generate_king(
    board: &Board,
    from: Square,
    piece: Piece,
    after_capture: bool,
    list: &mut CandidateList,
) {
    for dir in Direction::ALL {
        let mut jumped = None;
        let mut current = from;

        while let Some(next) = current.step(dir).filter(|&sq| board.contains(sq)) {
            current = next;

            match (board.piece_at(next), jumped) {
                // First empty cell past the jumped piece is the only landing offered
                (None, Some(victim)) => {
                    list.push(Candidate::capture(next, victim));
                    break;
                }

                (None, None) => {
                    if !after_capture {
                        list.push(Candidate::quiet(next));
                    }
                }

                (Some(other), None) if other.player() != piece.player() => jumped = Some(next),

                // Own piece, or a second piece behind the jumped one
                (Some(_), _) => break,
            }
        }
    }
}

/// Returns `true` if any piece owned by `player` has at least one candidate.
pub fn has_any_move(board: &Board, player: Player) -> bool {
    board
        .squares_of(player)
        .any(|square| !generate(board, square, false).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(layout: &str) -> Board {
        Board::from_layout(layout).unwrap()
    }

    fn targets(list: &CandidateList) -> Vec<Square> {
        list.iter().map(Candidate::to).collect()
    }

    #[test]
    fn test_first_men_move_toward_row_zero() {
        let b = board("8/8/8/8/8/8/1x6/8");
        let moves = generate(&b, Square::new(1, 6), false);
        assert_eq!(targets(&moves), [Square::new(2, 5), Square::new(0, 5)]);
        assert!(!moves.has_capture());
    }

    #[test]
    fn test_second_men_move_toward_last_row() {
        let b = board("8/2o5/8/8/8/8/8/8");
        let moves = generate(&b, Square::new(2, 1), false);
        assert_eq!(targets(&moves), [Square::new(3, 2), Square::new(1, 2)]);
    }

    #[test]
    fn test_men_never_move_backward() {
        // A First man with an opponent behind it has no capture
        let b = board("8/8/8/8/8/8/1x6/2o5");
        let moves = generate(&b, Square::new(1, 6), false);
        assert!(!moves.has_capture());
        assert!(moves.find(Square::new(3, 8)).is_none());
    }

    #[test]
    fn test_man_capture_scenario() {
        let b = board("8/8/8/8/8/2o5/1x6/8");
        let moves = generate(&b, Square::new(1, 6), false);

        let capture = moves.find(Square::new(3, 4)).unwrap();
        assert_eq!(capture.captured(), Some(Square::new(2, 5)));
        assert!(moves.find(Square::new(2, 5)).is_none());

        // The open diagonal still offers its simple move
        assert_eq!(moves.find(Square::new(0, 5)), Some(Candidate::quiet(Square::new(0, 5))));
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn test_man_capture_needs_empty_landing() {
        // Landing square is occupied
        let b = board("8/8/8/8/3o4/2o5/1x6/8");
        let moves = generate(&b, Square::new(1, 6), false);
        assert!(!moves.has_capture());

        // Landing square is off the board
        let b = board("8/8/8/8/8/8/o7/1x6");
        let moves = generate(&b, Square::new(1, 7), false);
        assert!(!moves.has_capture());
        assert_eq!(targets(&moves), [Square::new(2, 6)]);
    }

    #[test]
    fn test_man_cannot_jump_own_piece() {
        let b = board("8/8/8/8/8/2x5/1x6/8");
        let moves = generate(&b, Square::new(1, 6), false);
        assert_eq!(targets(&moves), [Square::new(0, 5)]);
    }

    #[test]
    fn test_men_have_no_simple_moves_after_capture() {
        let b = board("8/8/8/8/8/2o5/1x6/8");
        let moves = generate(&b, Square::new(1, 6), true);
        assert!(moves.iter().all(Candidate::is_capture));
        assert_eq!(targets(&moves), [Square::new(3, 4)]);

        // Nothing to capture means nothing at all
        let b = board("8/8/8/8/8/8/1x6/8");
        assert!(generate(&b, Square::new(1, 6), true).is_empty());
    }

    #[test]
    fn test_king_flies_along_all_diagonals() {
        let b = board("8/8/8/8/3X4/8/8/8");
        let moves = generate(&b, Square::new(3, 4), false);
        assert_eq!(moves.len(), 13);
        assert!(!moves.has_capture());
        assert!(!moves.is_truncated());

        // Direction order first, then distance
        assert_eq!(moves[0].to(), Square::new(4, 5));
        assert_eq!(moves[1].to(), Square::new(5, 6));
        assert_eq!(moves[2].to(), Square::new(6, 7));
        assert_eq!(moves[3].to(), Square::new(2, 5));
    }

    #[test]
    fn test_king_capture_stops_at_first_landing() {
        // King at (0,0), opponents at (2,2) and (4,4)
        let b = board("X7/8/2o5/8/4o3/8/8/8");
        let moves = generate(&b, Square::new(0, 0), false);

        assert_eq!(
            moves.iter().copied().collect::<Vec<_>>(),
            [
                Candidate::quiet(Square::new(1, 1)),
                Candidate::capture(Square::new(3, 3), Square::new(2, 2)),
            ]
        );
        assert!(moves.find(Square::new(5, 5)).is_none());
    }

    #[test]
    fn test_king_long_capture_remembers_victim() {
        let b = board("8/8/8/8/8/2o5/8/X7");
        let moves = generate(&b, Square::new(0, 7), true);
        assert_eq!(
            moves.iter().copied().collect::<Vec<_>>(),
            [Candidate::capture(Square::new(3, 4), Square::new(2, 5))]
        );
    }

    #[test]
    fn test_king_blocked_by_two_pieces_in_a_row() {
        let b = board("X7/1o6/2o5/8/8/8/8/8");
        assert!(generate(&b, Square::new(0, 0), false).is_empty());
    }

    #[test]
    fn test_king_blocked_by_own_piece() {
        let b = board("X7/8/2x5/3o4/8/8/8/8");
        let moves = generate(&b, Square::new(0, 0), false);
        assert_eq!(targets(&moves), [Square::new(1, 1)]);
    }

    #[test]
    fn test_king_after_capture_keeps_only_captures() {
        let b = board("8/8/8/8/3X4/8/1o6/8");
        let moves = generate(&b, Square::new(3, 4), true);
        assert_eq!(
            moves.iter().copied().collect::<Vec<_>>(),
            [Candidate::capture(Square::new(0, 7), Square::new(1, 6))]
        );

        let b = board("8/8/8/8/3X4/8/8/8");
        assert!(generate(&b, Square::new(3, 4), true).is_empty());
    }

    #[test]
    fn test_empty_or_offboard_source() {
        let b = board("8/8/8/8/8/8/8/8");
        assert!(generate(&b, Square::new(3, 4), false).is_empty());
        assert!(generate(&b, Square::new(30, 4), false).is_empty());
    }

    #[test]
    fn test_list_truncation_is_flagged() {
        let mut list = CandidateList::new();
        for i in 0..MAX_CANDIDATES + 2 {
            list.push(Candidate::quiet(Square::new(i as u8, 0)));
        }
        assert_eq!(list.len(), MAX_CANDIDATES);
        assert!(list.is_truncated());

        list.clear();
        assert!(list.is_empty());
        assert!(!list.is_truncated());
    }

    #[test]
    fn test_has_any_move() {
        let b = Board::default();
        assert!(has_any_move(&b, Player::First));
        assert!(has_any_move(&b, Player::Second));

        // A lone First man in the corner, blocked by a Second man that cannot be jumped
        let b = board("8/8/8/8/8/2o5/1o6/x7");
        assert!(!has_any_move(&b, Player::First));
    }
}
