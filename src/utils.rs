/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{bail, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Smallest supported board width.
pub const MIN_BOARD_SIZE: u8 = 4;

/// Largest supported board width.
pub const MAX_BOARD_SIZE: u8 = 16;

/// Board width of the standard game.
pub const DEFAULT_BOARD_SIZE: u8 = 8;

/// Rows of men each player starts with in the standard game.
pub const DEFAULT_ROWS_PER_SIDE: u8 = 3;

/// Shape of a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Config {
    /// Width and height of the board.
    pub size: u8,

    /// Number of rows of men each player starts with.
    pub rows_per_side: u8,
}

impl Config {
    /// Creates a new [`Config`], failing if the shape cannot hold a game.
    ///
    /// ```
    /// # use qorki::Config;
    /// assert!(Config::new(10, 4).is_ok());
    /// assert!(Config::new(8, 4).is_err()); // armies would touch
    /// assert!(Config::new(9, 3).is_err()); // odd width
    /// ```
    pub fn new(size: u8, rows_per_side: u8) -> Result<Self> {
        let config = Self {
            size,
            rows_per_side,
        };
        config.validate()?;
        Ok(config)
    }

    /// Ensures the board is an even size within bounds and that the two armies start apart.
    pub fn validate(&self) -> Result<()> {
        if self.size % 2 != 0 || !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.size) {
            bail!(
                "Board size must be an even number between {MIN_BOARD_SIZE} and {MAX_BOARD_SIZE}. Got {}",
                self.size
            );
        }

        if self.rows_per_side == 0 {
            bail!("Each player must start with at least one row of men");
        }

        if 2 * self.rows_per_side as u16 > self.size as u16 - 2 {
            bail!(
                "{} rows per side leaves no empty rows between the armies on a {}x{} board",
                self.rows_per_side,
                self.size,
                self.size
            );
        }

        Ok(())
    }

    /// Names of every option exposed through [`Config::get`].
    pub const OPTIONS: [&'static str; 2] = ["size", "rows"];

    /// Returns the value of the option `name`, if it exists.
    pub fn get(&self, name: &str) -> Option<String> {
        match name {
            "size" => Some(self.size.to_string()),
            "rows" => Some(self.rows_per_side.to_string()),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            rows_per_side: DEFAULT_ROWS_PER_SIDE,
        }
    }
}

/// Installs [`env_logger`] as the global logger, writing to `stderr`.
///
/// `RUST_LOG` is ignored. Only warnings are shown unless `debug` is set, and [`set_debug`] can change that later.
pub fn init_logger(debug: bool) -> Result<()> {
    // Let every record through the backend; `log::max_level` does the filtering
    env_logger::Builder::new()
        .filter_level(LevelFilter::Debug)
        .format_target(false)
        .format_timestamp(None)
        .try_init()
        .context("Failed to install logger")?;

    set_debug(debug);
    Ok(())
}

/// Switches debug-level logging on or off.
pub fn set_debug(debug: bool) {
    log::set_max_level(if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
}
