/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

use crate::{
    evaluate, generate, maybe_promote, Board, Candidate, CandidateList, Config, Outcome, Piece,
    Player, Square, DEFAULT_ROWS_PER_SIDE,
};

/// Where the session is in the select / move / capture cycle.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub enum Phase {
    /// No piece is selected.
    #[default]
    Idle,

    /// A piece is selected and its candidates are known.
    Selected(Square),

    /// The piece on this square just captured and must capture again.
    ///
    /// No other piece may be selected until the chain ends.
    CaptureChain(Square),
}

impl Phase {
    /// The selected square, if any.
    #[inline(always)]
    pub const fn selected(&self) -> Option<Square> {
        match self {
            Self::Idle => None,
            Self::Selected(square) | Self::CaptureChain(square) => Some(*square),
        }
    }
}

/// Why a click did nothing useful.
///
/// None of these are errors: the session always stays in a consistent state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Rejection {
    /// The click was outside the board. Ignored.
    OutOfBounds,

    /// Nothing is selected and the clicked cell holds no piece of the player to move. Ignored.
    InvalidSelection,

    /// The clicked cell is not a candidate of the selected piece.
    ///
    /// Drops the selection, unless a capture chain is in progress, in which case the click is ignored.
    IllegalDestination,

    /// The game has already been decided. Ignored.
    GameOver,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::OutOfBounds => "square is not on the board",
            Self::InvalidSelection => "no piece of the player to move on that square",
            Self::IllegalDestination => "not a legal destination for the selected piece",
            Self::GameOver => "the game is over",
        };
        write!(f, "{reason}")
    }
}

/// A move that was applied to the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,

    /// Square of the piece removed by this move, if it was a capture.
    pub captured: Option<Square>,

    /// Whether the moving man was crowned on arrival.
    pub promoted: bool,
}

/// What a single click did.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Click {
    /// A piece of the player to move was selected.
    Selected(Square),

    /// A move was applied and the same piece must keep capturing.
    Continue(MoveRecord),

    /// A move was applied and the turn passed to the opponent.
    TurnEnded(MoveRecord),

    /// Nothing was applied.
    Rejected(Rejection),
}

/// A single game: the board, whose turn it is, the scores, and the current selection.
///
/// All input arrives through [`Session::select_or_move`], one click at a time.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    config: Config,
    board: Board,
    to_move: Player,

    /// Number of opponent pieces each player has captured.
    scores: [u32; Player::COUNT],

    phase: Phase,

    /// Destinations of the selected piece. Empty while [`Phase::Idle`].
    candidates: CandidateList,
}

impl Session {
    /// Starts a new game with the shape described by `config`.
    pub fn new(config: Config) -> Result<Self> {
        let board = Board::startpos(&config)?;
        Ok(Self::from_parts(config, board, Player::First, [0; Player::COUNT]))
    }

    fn from_parts(
        config: Config,
        board: Board,
        to_move: Player,
        scores: [u32; Player::COUNT],
    ) -> Self {
        Self {
            config,
            board,
            to_move,
            scores,
            phase: Phase::Idle,
            candidates: CandidateList::new(),
        }
    }

    /// Creates a session from a layout string: piece placements, optionally followed by the player to move.
    ///
    /// ```
    /// # use qorki::{Player, Session};
    /// let session = Session::from_layout("8/8/8/8/8/2o5/1x6/8 o").unwrap();
    /// assert_eq!(session.current_player(), Player::Second);
    /// assert_eq!(session.to_layout(), "8/8/8/8/8/2o5/1x6/8 o");
    /// ```
    pub fn from_layout(layout: &str) -> Result<Self> {
        let mut parts = layout.split_whitespace();
        let Some(placements) = parts.next() else {
            bail!("Layout string must contain piece placements");
        };
        let board = Board::from_layout(placements)?;
        let to_move = match parts.next() {
            Some(token) => token
                .parse()
                .with_context(|| format!("Invalid player to move in layout {layout:?}"))?,
            None => Player::First,
        };
        if let Some(extra) = parts.next() {
            bail!("Unexpected trailing {extra:?} in layout {layout:?}");
        }

        let size = board.size();
        let config = Config::new(size, DEFAULT_ROWS_PER_SIDE.min(size / 2 - 1))?;
        Ok(Self::from_parts(config, board, to_move, [0; Player::COUNT]))
    }

    /// Generates the layout string of the current position.
    pub fn to_layout(&self) -> String {
        format!("{} {}", self.board.to_layout(), self.to_move.char())
    }

    /// Puts the board back in its starting setup and resets turn, scores, and selection.
    pub fn restart(&mut self) {
        *self = Self::from_parts(
            self.config,
            Board::startpos(&self.config).unwrap_or_default(),
            Player::First,
            [0; Player::COUNT],
        );
        log::debug!("New game on a {0}x{0} board", self.config.size);
    }

    /// Handles one click on `square`: selects a piece, moves the selected one, or is rejected.
    ///
    /// This is the only way the game advances.
    pub fn select_or_move(&mut self, square: Square) -> Click {
        if !self.board.contains(square) {
            return Click::Rejected(Rejection::OutOfBounds);
        }

        if self.outcome().is_over() {
            return Click::Rejected(Rejection::GameOver);
        }

        match self.phase {
            Phase::Idle => self.select(square),

            Phase::Selected(from) => {
                if let Some(candidate) = self.candidates.find(square) {
                    self.apply(from, candidate)
                } else if self.owns(square) {
                    self.select(square)
                } else {
                    self.deselect();
                    Click::Rejected(Rejection::IllegalDestination)
                }
            }

            Phase::CaptureChain(from) => match self.candidates.find(square) {
                Some(candidate) => self.apply(from, candidate),
                None => Click::Rejected(Rejection::IllegalDestination),
            },
        }
    }

    /// Drops the current selection.
    ///
    /// Returns `false`, and does nothing, if a capture chain is in progress.
    pub fn deselect(&mut self) -> bool {
        if matches!(self.phase, Phase::CaptureChain(_)) {
            return false;
        }
        self.phase = Phase::Idle;
        self.candidates.clear();
        true
    }

    fn owns(&self, square: Square) -> bool {
        self.board
            .piece_at(square)
            .is_some_and(|piece| piece.player() == self.to_move)
    }

    fn select(&mut self, square: Square) -> Click {
        if !self.owns(square) {
            return Click::Rejected(Rejection::InvalidSelection);
        }

        self.phase = Phase::Selected(square);
        self.candidates = generate(&self.board, square, false);
        log::debug!(
            "{} selected {square}: {:?}",
            self.to_move,
            self.candidates
        );

        Click::Selected(square)
    }

    fn apply(&mut self, from: Square, candidate: Candidate) -> Click {
        let mover = self.to_move;
        let Some(piece) = self.board.take(from) else {
            // Only reachable if the phase went stale
            log::warn!("Selected square {from} is empty; dropping selection");
            self.phase = Phase::Idle;
            self.candidates.clear();
            return Click::Rejected(Rejection::InvalidSelection);
        };

        let to = candidate.to();
        self.board.place(piece, to);

        let mut captured = None;
        if let Some(victim) = candidate.captured() {
            if self.board.take(victim).is_some() {
                self.scores[mover] += 1;
                captured = Some(victim);
                log::debug!("{mover} captured {victim} moving {from} -> {to}");
            }
        }

        let promoted = maybe_promote(&mut self.board, to, mover);
        if promoted {
            log::debug!("{mover} crowned a king on {to}");
        }

        let record = MoveRecord {
            from,
            to,
            captured,
            promoted,
        };

        // Promotion ends the turn, even if more captures are available.
        if promoted || captured.is_none() {
            self.end_turn();
            return Click::TurnEnded(record);
        }

        let next = generate(&self.board, to, true);
        if next.is_empty() {
            self.end_turn();
            Click::TurnEnded(record)
        } else {
            log::debug!("{mover} must continue capturing from {to}: {next:?}");
            self.phase = Phase::CaptureChain(to);
            self.candidates = next;
            Click::Continue(record)
        }
    }

    fn end_turn(&mut self) {
        self.phase = Phase::Idle;
        self.candidates.clear();
        self.to_move = self.to_move.opponent();
        log::debug!("{} to move", self.to_move);

        if let Outcome::Win(winner) = self.outcome() {
            log::debug!("Game over: {winner} wins");
        }
    }

    /// Passes the turn without moving. Drops any selection, including a capture chain.
    pub fn toggle_player(&mut self) {
        self.phase = Phase::Idle;
        self.candidates.clear();
        self.to_move = self.to_move.opponent();
    }

    /// Places `piece` on `square`, dropping any selection.
    pub fn place(&mut self, piece: Piece, square: Square) -> Result<()> {
        if !self.board.contains(square) {
            bail!("Cannot place {piece} on {square}: it is not on the board");
        }
        self.board.place(piece, square);
        self.phase = Phase::Idle;
        self.candidates.clear();
        Ok(())
    }

    /// Removes the piece on `square`, dropping any selection.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.board.take(square);
        if piece.is_some() {
            self.phase = Phase::Idle;
            self.candidates.clear();
        }
        piece
    }

    /// The settings this game was created with.
    #[inline(always)]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Read-only view of the board.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The player whose turn it is.
    #[inline(always)]
    pub const fn current_player(&self) -> Player {
        self.to_move
    }

    #[inline(always)]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The selected square, if any.
    #[inline(always)]
    pub const fn selected(&self) -> Option<Square> {
        self.phase.selected()
    }

    /// Returns `true` while a capture chain is in progress.
    #[inline(always)]
    pub const fn is_capturing(&self) -> bool {
        matches!(self.phase, Phase::CaptureChain(_))
    }

    /// Destinations of the selected piece, for highlighting.
    #[inline(always)]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Returns `true` if the selected piece had more destinations than a [`CandidateList`] can hold.
    #[inline(always)]
    pub const fn candidates_truncated(&self) -> bool {
        self.candidates.is_truncated()
    }

    /// Capture counts, as `(first, second)`.
    #[inline(always)]
    pub fn scores(&self) -> (u32, u32) {
        (self.scores[Player::First], self.scores[Player::Second])
    }

    /// Capture count of `player`.
    #[inline(always)]
    pub fn score(&self, player: Player) -> u32 {
        self.scores[player]
    }

    /// Evaluates the position for the player to move.
    #[inline(always)]
    pub fn outcome(&self) -> Outcome {
        evaluate(&self.board, self.to_move)
    }

    pub(crate) fn raw_scores(&self) -> [u32; Player::COUNT] {
        self.scores
    }

    /// Rebuilds a session from already-validated parts, restoring the selection.
    pub(crate) fn restore(
        config: Config,
        board: Board,
        to_move: Player,
        scores: [u32; Player::COUNT],
        selected: Option<Square>,
        capturing: bool,
    ) -> Result<Self> {
        let mut session = Self::from_parts(config, board, to_move, scores);

        match (selected, capturing) {
            (None, false) => {}
            (None, true) => bail!("A capture chain requires a selected piece"),
            (Some(square), _) => {
                if !session.board.contains(square) {
                    bail!("Selected square {square} is not on the board");
                }
                if !session.owns(square) {
                    bail!("Selected square {square} does not hold a piece of {to_move}");
                }

                let candidates = generate(&session.board, square, capturing);
                if capturing && candidates.is_empty() {
                    bail!("Capture chain from {square} has no capture to continue with");
                }

                session.phase = if capturing {
                    Phase::CaptureChain(square)
                } else {
                    Phase::Selected(square)
                };
                session.candidates = candidates;
            }
        }

        Ok(session)
    }
}

impl Default for Session {
    /// A standard 8x8 game.
    fn default() -> Self {
        Self::from_parts(
            Config::default(),
            Board::default(),
            Player::First,
            [0; Player::COUNT],
        )
    }
}

impl FromStr for Session {
    type Err = anyhow::Error;
    /// Wrapper for [`Session::from_layout`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_layout(s)
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.board.to_string();
        let (first, second) = self.scores();

        let candidates = if self.candidates.is_empty() {
            String::from("-")
        } else {
            self.candidates
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };

        let info = [
            format!("      Turn: {}", self.to_move),
            format!("     Score: {first} - {second}"),
            format!(
                "    Pieces: {} - {}",
                self.board.count(Player::First),
                self.board.count(Player::Second)
            ),
            format!(
                "  Selected: {}{}",
                self.selected()
                    .map(|sq| sq.to_string())
                    .unwrap_or(String::from("-")),
                if self.is_capturing() {
                    " (capturing)"
                } else {
                    ""
                }
            ),
            format!("     Moves: {candidates}"),
            format!("   Outcome: {}", self.outcome()),
            format!("    Layout: {}", self.to_layout()),
        ];

        let lines = board
            .lines()
            .enumerate()
            .map(|(i, line)| match info.get(i) {
                Some(extra) => format!("{line}  {extra}"),
                None => line.to_string(),
            })
            .collect::<Vec<_>>();

        write!(f, "{}", lines.join("\n"))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("layout", &self.to_layout())
            .field("scores", &self.scores)
            .field("phase", &self.phase)
            .field("candidates", &self.candidates)
            .finish()
    }
}
