/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Legal destinations for a single piece.
mod movegen;

/// Pieces and the players that own them.
mod piece;

/// The grid of cells and its layout-string form.
mod position;

/// Promotion and game-over detection.
mod rules;

/// Board coordinates and diagonal directions.
mod square;

pub use movegen::*;
pub use piece::*;
pub use position::*;
pub use rules::*;
pub use square::*;
