use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use embring_frame::{BufferConfig, DEFAULT_CAPACITY};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod listen;
pub mod pump;
pub mod replay;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bind a socket, accept a link and print every framed message.
    Listen(ListenArgs),
    /// Connect to a socket and write raw bytes.
    Send(SendArgs),
    /// Frame a captured byte stream offline.
    Replay(ReplayArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Send(args) => send::run(args),
        Command::Replay(args) => replay::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug, Clone)]
pub struct BufferArgs {
    /// Ring buffer capacity in bytes.
    #[arg(long, env = "EMBRING_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,
}

impl BufferArgs {
    pub fn config(&self) -> BufferConfig {
        BufferConfig {
            capacity: self.capacity,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Socket path to bind.
    pub path: PathBuf,
    #[command(flatten)]
    pub buffer: BufferArgs,
    /// Exit after printing N messages.
    #[arg(long)]
    pub count: Option<usize>,
    /// Delay between polls when the link is idle (e.g. 10ms, 1s).
    #[arg(long, default_value = "10ms")]
    pub poll_interval: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    /// Bytes as hex pairs, e.g. "CC 2A C1".
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub hex: Option<String>,
    /// Read raw bytes from file.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Captured raw byte stream.
    #[arg(conflicts_with = "hex", required_unless_present = "hex")]
    pub input: Option<PathBuf>,
    /// Bytes as hex pairs instead of a file.
    #[arg(long)]
    pub hex: Option<String>,
    #[command(flatten)]
    pub buffer: BufferArgs,
    /// Deliver the stream in chunks of this many bytes, polling after each.
    #[arg(long, default_value_t = 1)]
    pub chunk: usize,
    /// Print the raw ring storage after replay.
    #[arg(long)]
    pub dump: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    if millis {
        Ok(Duration::from_millis(value))
    } else {
        Ok(Duration::from_secs(value))
    }
}
