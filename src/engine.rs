/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    path::Path,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::{
    generate, legal_turns, print_perft, set_debug, Click, Config, EngineCommand, MoveRecord,
    Outcome, Rejection, Session, Snapshot, Square,
};

/// The front end of a game: owns the [`Session`] and executes commands one at a time.
#[derive(Debug)]
pub struct Engine {
    /// The game being played.
    ///
    /// Only this engine's loop ever touches it, so every command sees the result of the previous one.
    session: Session,

    /// One half of a channel, responsible for sending commands to the engine to execute.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands for the engine to execute.
    receiver: Receiver<EngineCommand>,
}

impl Engine {
    /// Constructs a new [`Engine`] playing a game shaped by `config`, to be executed with [`Engine::run`].
    pub fn new(config: Config) -> Result<Self> {
        let (sender, receiver) = channel();

        Ok(Self {
            session: Session::new(config)?,
            sender,
            receiver,
        })
    }

    /// Returns a string of the engine's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// The game being played.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Sends an [`EngineCommand`] to the engine to be executed.
    pub fn send_command(&self, command: EngineCommand) -> Result<()> {
        self.sender
            .send(command)
            .context("Failed to send command to engine")
    }

    /// Execute the main event loop for the engine.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    pub fn run(&mut self) -> Result<()> {
        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                log::debug!("Input handler thread stopping: {err}");
            }
        });

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            if let EngineCommand::Exit = cmd {
                break;
            }

            // Keep running, even on error
            if let Err(e) = self.execute(cmd) {
                eprintln!("Error: {e:#}");
            }
        }

        Ok(())
    }

    /// Executes a single command against the current game.
    pub fn execute(&mut self, cmd: EngineCommand) -> Result<()> {
        match cmd {
            EngineCommand::Click { square } => self.click(square),

            EngineCommand::Debug { state } => {
                set_debug(state.is_on());
                println!("debug := {}", if state.is_on() { "on" } else { "off" });
            }

            EngineCommand::Display => self.display(),

            EngineCommand::Exit => {}

            EngineCommand::Flip => self.session.toggle_player(),

            EngineCommand::Layout => println!("{}", self.session.to_layout()),

            EngineCommand::Load { path } => self.load(&path)?,

            EngineCommand::Moves { square } => self.moves(square),

            EngineCommand::NewGame => self.session.restart(),

            EngineCommand::Option { name } => self.option(name.as_deref()),

            EngineCommand::Perft { depth } => {
                print_perft::<false>(&self.session, depth);
            }

            EngineCommand::Place { piece, square } => self.session.place(piece, square)?,

            EngineCommand::Save { path } => self.save(&path)?,

            EngineCommand::Setup { layout } => self.setup(&layout.join(" "))?,

            EngineCommand::Splitperft { depth } => {
                print_perft::<true>(&self.session, depth);
            }

            EngineCommand::Take { square } => {
                if self.session.take(square).is_none() {
                    bail!("There is no piece on {square}");
                }
            }
        }

        Ok(())
    }

    /// Executes the `click` command, reporting what happened.
    fn click(&mut self, square: Square) {
        let mover = self.session.current_player();

        match self.session.select_or_move(square) {
            Click::Selected(square) => {
                println!(
                    "Selected {square}: {}",
                    Self::list(self.session.candidates().iter())
                );
                if self.session.candidates_truncated() {
                    eprintln!("Some destinations of {square} could not be listed");
                }
            }

            Click::Continue(record) => {
                println!(
                    "{mover}: {} ... must continue capturing: {}",
                    Self::describe(&record),
                    Self::list(self.session.candidates().iter())
                );
            }

            Click::TurnEnded(record) => {
                println!("{mover}: {}", Self::describe(&record));
                match self.session.outcome() {
                    Outcome::Ongoing => println!("{} to move", self.session.current_player()),
                    over => println!("{over}"),
                }
            }

            Click::Rejected(Rejection::IllegalDestination) if !self.session.is_capturing() => {
                println!("{}; selection cleared", Rejection::IllegalDestination);
            }

            Click::Rejected(reason) => println!("Ignored: {reason}"),
        }
    }

    fn describe(record: &MoveRecord) -> String {
        let mut desc = match record.captured {
            Some(captured) => format!("{} x {} -> {}", record.from, captured, record.to),
            None => format!("{} -> {}", record.from, record.to),
        };
        if let Some(steps) = record.from.diagonal_distance(record.to).filter(|&n| n > 2) {
            desc += &format!(" ({steps} cells)");
        }
        if record.promoted {
            desc += " (crowned)";
        }
        desc
    }

    fn list<T: ToString>(items: impl Iterator<Item = T>) -> String {
        let items = items.map(|item| item.to_string()).collect::<Vec<_>>();
        if items.is_empty() {
            String::from("(none)")
        } else {
            items.join(", ")
        }
    }

    /// Executes the `display` command, printing the current game state.
    fn display(&self) {
        println!("{}", self.session);
    }

    /// Executes the `moves` command.
    ///
    /// With a square, lists that piece's destinations. Otherwise lists every complete turn for the player to move.
    fn moves(&self, square: Option<Square>) {
        let moves = if let Some(square) = square {
            Self::list(generate(self.session.board(), square, self.session.is_capturing()).iter())
        } else {
            Self::list(legal_turns(&self.session).into_iter().map(|(turn, _)| turn))
        };
        println!("{moves}");
    }

    /// Executes the `option` command, printing one or every config value.
    fn option(&self, name: Option<&str>) {
        let config = self.session.config();
        match name {
            Some(name) => match config.get(name) {
                Some(value) => println!("{name} := {value}"),
                None => println!("{} has no option {name:?}", self.name()),
            },
            None => {
                for name in Config::OPTIONS {
                    if let Some(value) = config.get(name) {
                        println!("{name} := {value}");
                    }
                }
            }
        }
    }

    /// Set the position to the supplied layout string.
    fn setup(&mut self, layout: &str) -> Result<()> {
        self.session = layout.parse()?;
        Ok(())
    }

    /// Writes the current game to `path`.
    fn save(&self, path: &Path) -> Result<()> {
        self.session.export_state().save(path)?;
        println!("Saved game to {}", path.display());
        Ok(())
    }

    /// Replaces the current game with the one saved at `path`.
    fn load(&mut self, path: &Path) -> Result<()> {
        let snapshot = Snapshot::load(path)?;
        self.session.import_state(snapshot)?;
        println!("Loaded game from {}", path.display());
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        let (sender, receiver) = channel();

        Self {
            session: Session::default(),
            sender,
            receiver,
        }
    }
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(EngineCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            bail!("Engine received input of 0 bytes and is quitting");
        }

        // Trim any leading/trailing whitespace
        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match EngineCommand::try_parse_from(buf.split_ascii_whitespace()) {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to engine")?,

            // If an invalid command was received, just print the error and continue running
            Err(err) => eprintln!("{err}"),
        }
    }
}
