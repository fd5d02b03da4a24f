/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Board representation, move generation, promotion, and game-over detection.
mod board;

/// Command-line arguments and the commands understood by the engine.
mod cli;

/// Code related to the engine's functionality, such as user input handling.
mod engine;

/// A single game, advanced one click at a time.
mod game;

/// Counting reachable positions, for testing move generation.
mod perft;

/// Saving and restoring games.
mod snapshot;

/// Misc utility functions, constants, and types.
mod utils;

pub use board::*;
pub use cli::*;
pub use engine::*;
pub use game::*;
pub use perft::*;
pub use snapshot::*;
pub use utils::*;
