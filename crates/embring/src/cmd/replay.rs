use std::fs;

use embring_frame::SerialBuffer;
use embring_transport::MemoryTransport;
use tracing::{info, warn};

use crate::cmd::pump::pump;
use crate::cmd::ReplayArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::hexfmt::parse_hex;
use crate::output::{print_message, OutputFormat};

pub fn run(args: ReplayArgs, format: OutputFormat) -> CliResult<i32> {
    if args.chunk == 0 {
        return Err(CliError::new(USAGE, "--chunk must be greater than zero"));
    }
    let (stream, source) = load_stream(&args)?;

    let mut buffer = SerialBuffer::with_config(MemoryTransport::new(), args.buffer.config())
        .map_err(|err| frame_error("invalid buffer config", err))?;

    let mut printed = 0usize;
    for chunk in stream.chunks(args.chunk) {
        buffer.get_mut().feed(chunk);
        pump(&mut buffer, |message| {
            printed += 1;
            print_message(&message, printed, &source, format);
        })
        .map_err(|err| frame_error("replay failed", err))?;
    }

    if !buffer.is_empty() {
        warn!(
            trailing = buffer.occupied(),
            "stream ends inside an incomplete message"
        );
    }
    info!(messages = printed, bytes = stream.len(), "replay finished");

    if args.dump {
        eprintln!("{}", buffer.dump());
    }

    Ok(SUCCESS)
}

fn load_stream(args: &ReplayArgs) -> CliResult<(Vec<u8>, String)> {
    if let Some(hex) = &args.hex {
        return Ok((parse_hex(hex)?, "hex".to_string()));
    }
    match &args.input {
        Some(path) => {
            let bytes = fs::read(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
            Ok((bytes, path.display().to_string()))
        }
        None => Err(CliError::new(USAGE, "replay needs an input file or --hex")),
    }
}
