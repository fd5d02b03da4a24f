/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, time::Instant};

use crate::{Click, Session, Square};

/// A complete turn: the path one piece took, from its starting square to where the turn ended.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Turn {
    path: Vec<Square>,
    captures: usize,
}

impl Turn {
    /// Squares visited, starting with the square the piece moved from.
    #[inline(always)]
    pub fn path(&self) -> &[Square] {
        &self.path
    }

    /// Number of pieces captured during this turn.
    #[inline(always)]
    pub const fn captures(&self) -> usize {
        self.captures
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.captures > 0 { "x" } else { "-" };
        let squares = self
            .path
            .iter()
            .map(|sq| sq.to_string())
            .collect::<Vec<_>>();
        write!(f, "{}", squares.join(sep))
    }
}

impl fmt::Debug for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Every turn the player to move can complete from `session`, along with the session after that turn.
///
/// Capture chains are followed to their end, so each entry hands the move to the opponent.
/// If a chain is already in progress, only its continuations are listed.
pub fn legal_turns(session: &Session) -> Vec<(Turn, Session)> {
    let mut turns = Vec::new();
    if session.outcome().is_over() {
        return turns;
    }

    if let Some(from) = session.selected().filter(|_| session.is_capturing()) {
        let turn = Turn {
            path: vec![from],
            captures: 0,
        };
        follow(session, turn, &mut turns);
        return turns;
    }

    let mut idle = session.clone();
    idle.deselect();

    for from in session.board().squares_of(session.current_player()) {
        let mut selected = idle.clone();
        if !matches!(selected.select_or_move(from), Click::Selected(_)) {
            continue;
        }
        let turn = Turn {
            path: vec![from],
            captures: 0,
        };
        follow(&selected, turn, &mut turns);
    }

    turns
}

/// Plays every candidate of the selected piece, recursing into capture chains.
fn follow(session: &Session, turn: Turn, turns: &mut Vec<(Turn, Session)>) {
    for candidate in session.candidates() {
        let mut next = session.clone();
        let click = next.select_or_move(candidate.to());

        let mut turn = turn.clone();
        turn.path.push(candidate.to());
        turn.captures += candidate.is_capture() as usize;

        match click {
            Click::TurnEnded(_) => turns.push((turn, next)),
            Click::Continue(_) => follow(&next, turn, turns),
            Click::Selected(_) | Click::Rejected(_) => {}
        }
    }
}

/// Perform a perft at the specified depth, counting the positions reachable after `depth` complete turns.
///
/// A capture chain counts as a single turn.
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available turns.
#[inline(always)]
pub fn perft(session: &Session, depth: usize) -> u64 {
    perft_generic::<true, false>(session, depth)
}

/// Perform a splitperft at the specified depth, printing the number of positions reachable after each turn
/// available at the root.
#[inline(always)]
pub fn splitperft(session: &Session, depth: usize) -> u64 {
    perft_generic::<true, true>(session, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, this will perform a splitperft.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(session: &Session, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let turns = legal_turns(session);

    // Bulk counting; no need to recurse again just to return 1 for each turn.
    if BULK && !SPLIT && depth == 1 {
        return turns.len() as u64;
    }

    turns.into_iter().fold(0, |nodes, (turn, next)| {
        let new_nodes = perft_generic::<BULK, false>(&next, depth - 1);

        if SPLIT {
            println!("{turn}\t{new_nodes}");
        }

        nodes + new_nodes
    })
}

/// Runs a perft and prints the node count with timing information.
pub fn print_perft<const SPLIT: bool>(session: &Session, depth: usize) -> u64 {
    let now = Instant::now();
    let nodes = perft_generic::<true, SPLIT>(session, depth);
    let elapsed = now.elapsed();

    let nps = nodes as f64 / elapsed.as_secs_f64();
    println!("\n{nodes} nodes in {elapsed:?} ({nps:.0} nps)");

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_zero() {
        assert_eq!(perft(&Session::default(), 0), 1);
    }

    #[test]
    fn test_bulk_matches_full() {
        let session = Session::default();
        for depth in 1..=3 {
            assert_eq!(
                perft_generic::<true, false>(&session, depth),
                perft_generic::<false, false>(&session, depth)
            );
        }
    }

    #[test]
    fn test_chain_is_one_turn() {
        let session = Session::from_layout("8/8/8/4o3/8/2o5/1x6/8").unwrap();
        let turns = legal_turns(&session);

        // (1,6) can step to (0,5) or take both men in one turn
        assert_eq!(turns.len(), 2);
        let chain = turns
            .iter()
            .find(|(turn, _)| turn.captures() == 2)
            .unwrap();
        assert_eq!(chain.0.to_string(), "(1,6)x(3,4)x(5,2)");
        assert_eq!(chain.1.board().count(crate::Player::Second), 0);
    }

    #[test]
    fn test_mid_chain_only_continues() {
        let mut session = Session::from_layout("8/8/8/4o3/8/2o5/1x6/6x1").unwrap();
        session.select_or_move(Square::new(1, 6));
        session.select_or_move(Square::new(3, 4));
        assert!(session.is_capturing());

        let turns = legal_turns(&session);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].0.path(), &[Square::new(3, 4), Square::new(5, 2)]);
    }

    #[test]
    fn test_no_turns_after_game_over() {
        let session = Session::from_layout("8/8/8/8/8/8/8/x7 o").unwrap();
        assert!(legal_turns(&session).is_empty());
        assert_eq!(perft(&session, 3), 0);
    }
}
