/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::Result;
use clap::Parser;
use qorki::{init_logger, Args, Config, Engine, EngineCommand};

fn main() {
    if let Err(e) = start() {
        eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
        std::process::exit(1);
    }
}

fn start() -> Result<()> {
    let args = Args::parse();
    init_logger(args.debug)?;

    let config = Config::new(args.size, args.rows)?;
    let mut engine = Engine::new(config)?;

    // Startup commands are separated by `;`, either as their own argument or glued to the end of one
    let startup = args.commands.join(" ");
    for line in startup.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        match line.parse::<EngineCommand>() {
            Ok(cmd) => engine.send_command(cmd)?,
            Err(e) => eprintln!("ERROR on input {line:?}:\n{e}"),
        }
    }

    engine.run()
}
