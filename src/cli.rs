/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{path::PathBuf, str::FromStr};

use crate::{Piece, Square, DEFAULT_BOARD_SIZE, DEFAULT_ROWS_PER_SIDE};
use clap::{builder::PossibleValue, Parser, ValueEnum};

/// Command-line arguments for the `qorki` binary.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Width and height of the board. Must be even.
    #[arg(short, long, default_value_t = DEFAULT_BOARD_SIZE)]
    pub size: u8,

    /// Rows of men each player starts with.
    #[arg(short, long, default_value_t = DEFAULT_ROWS_PER_SIDE)]
    pub rows: u8,

    /// Print debug logs for every turn event.
    #[arg(short, long, default_value = "false")]
    pub debug: bool,

    /// Commands to execute on startup, separated by `;`.
    ///
    /// For example: `qorki -- click 0,5 ";" click 1,4 ";" display`
    #[arg(last = true)]
    pub commands: Vec<String>,
}

/// A command to be sent to the engine.
#[derive(Debug, Clone, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<COMMAND>")
)]
pub enum EngineCommand {
    /// Click on a square: selects a piece, or moves the selected piece there.
    #[command(alias = "c")]
    Click { square: Square },

    /// Toggle debug logging.
    Debug { state: Switch },

    /// Print a visual representation of the current game state.
    #[command(alias = "d")]
    Display,

    /// Quit the engine.
    #[command(alias = "quit")]
    Exit,

    /// Passes the turn to the other player without moving.
    Flip,

    /// Generate and print a layout string for the current position.
    Layout,

    /// Read a saved game from the provided JSON file.
    ///
    /// If the file is not a valid game, the current game is left untouched.
    Load { path: PathBuf },

    /// Shows every complete turn available to the player to move, or the destinations of a single piece.
    Moves { square: Option<Square> },

    /// Start a new game with the current board size.
    #[command(alias = "restart")]
    NewGame,

    /// Display the current value of the specified option, or of every option.
    Option { name: Option<String> },

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Place a piece on the provided square.
    ///
    /// No enforcement of legality, so you can place a king on any cell, if you want.
    Place { piece: Piece, square: Square },

    /// Save the current game to the provided JSON file.
    Save { path: PathBuf },

    /// Set up the position described by a layout string, optionally followed by the player to move.
    #[command(alias = "position")]
    Setup {
        #[arg(required = true, num_args = 1..=2)]
        layout: Vec<String>,
    },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Remove the piece at the provided square.
    Take { square: Square },
}

impl FromStr for EngineCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`EngineCommand`] from a string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}

/// An on/off toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    #[inline(always)]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl ValueEnum for Switch {
    fn value_variants<'a>() -> &'a [Self] {
        &[Switch::On, Switch::Off]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = match self {
            Switch::On => PossibleValue::new("on").aliases(["true", "1"]),
            Switch::Off => PossibleValue::new("off").aliases(["false", "0"]),
        };

        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_click() {
        let cmd: EngineCommand = "click 3,4".parse().unwrap();
        assert!(matches!(cmd, EngineCommand::Click { square } if square == Square::new(3, 4)));

        let cmd: EngineCommand = "c (0,5)".parse().unwrap();
        assert!(matches!(cmd, EngineCommand::Click { square } if square == Square::new(0, 5)));

        assert!("click".parse::<EngineCommand>().is_err());
        assert!("click a4".parse::<EngineCommand>().is_err());
    }

    #[test]
    fn test_parse_place() {
        let cmd: EngineCommand = "place X 2,3".parse().unwrap();
        assert!(matches!(
            cmd,
            EngineCommand::Place { piece, square } if piece == Piece::FIRST_KING && square == Square::new(2, 3)
        ));
    }

    #[test]
    fn test_parse_setup() {
        let cmd: EngineCommand = "setup 8/8/8/8/8/2o5/1x6/8 o".parse().unwrap();
        let EngineCommand::Setup { layout } = cmd else {
            panic!("Expected a setup command");
        };
        assert_eq!(layout, ["8/8/8/8/8/2o5/1x6/8", "o"]);
    }

    #[test]
    fn test_parse_aliases() {
        assert!(matches!("quit".parse::<EngineCommand>(), Ok(EngineCommand::Exit)));
        assert!(matches!("restart".parse::<EngineCommand>(), Ok(EngineCommand::NewGame)));
        assert!(matches!("d".parse::<EngineCommand>(), Ok(EngineCommand::Display)));
        assert!(matches!(
            "debug on".parse::<EngineCommand>(),
            Ok(EngineCommand::Debug { state: Switch::On })
        ));
        assert!(matches!(
            "debug 0".parse::<EngineCommand>(),
            Ok(EngineCommand::Debug { state: Switch::Off })
        ));
    }
}
