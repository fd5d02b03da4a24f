/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fs,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{Board, Config, Player, Session, Square};

/// Everything needed to resume a [`Session`] exactly where it was left.
///
/// Cells are stored one string per row, from row `0`, with one character per cell:
/// `.` for empty, `x`/`X` for First's men/kings, and `o`/`O` for Second's.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub config: Config,
    pub rows: Vec<String>,
    pub to_move: Player,

    /// Capture counts, indexed by player.
    pub scores: [u32; Player::COUNT],

    pub selected: Option<Square>,

    /// Whether `selected` is in the middle of a capture chain.
    pub capturing: bool,
}

impl Snapshot {
    /// Serializes this snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize snapshot")
    }

    /// Parses a snapshot from JSON. The result is not validated until it is imported.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse snapshot")
    }

    /// Writes this snapshot to `path` as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a snapshot from the JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file =
            fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to read snapshot from {}", path.display()))
    }
}

impl Session {
    /// Captures the full state of this session.
    pub fn export_state(&self) -> Snapshot {
        Snapshot {
            config: *self.config(),
            rows: self.board().to_rows(),
            to_move: self.current_player(),
            scores: self.raw_scores(),
            selected: self.selected(),
            capturing: self.is_capturing(),
        }
    }

    /// Replaces the state of this session with `snapshot`.
    ///
    /// The snapshot is validated in full first. On error, this session is left untouched.
    /// Candidates are not stored; they are regenerated from the restored selection.
    ///
    /// ```
    /// # use qorki::{Session, Square};
    /// let mut session = Session::default();
    /// session.select_or_move(Square::new(0, 5));
    /// let snapshot = session.export_state();
    ///
    /// let mut restored = Session::default();
    /// restored.import_state(snapshot).unwrap();
    /// assert_eq!(restored, session);
    /// ```
    pub fn import_state(&mut self, snapshot: Snapshot) -> Result<()> {
        match Self::from_snapshot(snapshot) {
            Ok(session) => {
                *self = session;
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected snapshot: {e:#}");
                Err(e)
            }
        }
    }

    fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let Snapshot {
            config,
            rows,
            to_move,
            scores,
            selected,
            capturing,
        } = snapshot;

        config.validate().context("Invalid snapshot config")?;
        let board = Board::from_rows(config.size, &rows).context("Invalid snapshot board")?;

        Self::restore(config, board, to_move, scores, selected, capturing)
    }
}
