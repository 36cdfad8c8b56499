mod cmd;
mod exit;
mod hexfmt;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "embring", version, about = "Serial link message framing CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listen_with_capacity() {
        let cli = Cli::try_parse_from([
            "embring",
            "listen",
            "/tmp/link.sock",
            "--capacity",
            "128",
            "--count",
            "2",
        ])
        .expect("listen args should parse");

        match cli.command {
            Command::Listen(args) => {
                assert_eq!(args.buffer.capacity, 128);
                assert_eq!(args.count, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn send_requires_payload() {
        let err = Cli::try_parse_from(["embring", "send", "/tmp/link.sock"])
            .expect_err("missing payload should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_conflicting_send_payloads() {
        let err = Cli::try_parse_from([
            "embring",
            "send",
            "/tmp/link.sock",
            "--hex",
            "C1",
            "--file",
            "/tmp/x.bin",
        ])
        .expect_err("conflicting args should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_replay_with_hex() {
        let cli = Cli::try_parse_from([
            "embring", "replay", "--hex", "CC 01 C1", "--chunk", "2", "--dump",
        ])
        .expect("replay args should parse");
        match cli.command {
            Command::Replay(args) => {
                assert_eq!(args.chunk, 2);
                assert!(args.dump);
                assert!(args.input.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
