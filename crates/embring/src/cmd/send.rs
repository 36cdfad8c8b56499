use std::fs;

use embring_frame::SerialBuffer;
use embring_transport::UnixDomainSocket;
use tracing::debug;

use crate::cmd::SendArgs;
use crate::exit::{frame_error, io_error, transport_error, CliError, CliResult, SUCCESS, USAGE};
use crate::hexfmt::parse_hex;

pub fn run(args: SendArgs) -> CliResult<i32> {
    let bytes = resolve_payload(&args)?;
    if bytes.is_empty() {
        return Err(CliError::new(USAGE, "nothing to send"));
    }

    let link = UnixDomainSocket::connect(&args.path)
        .map_err(|err| transport_error("connect failed", err))?;
    let mut buffer = SerialBuffer::new(link);
    buffer
        .write_bytes(&bytes)
        .map_err(|err| frame_error("send failed", err))?;

    debug!(bytes = bytes.len(), "sent");
    Ok(SUCCESS)
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        return parse_hex(hex);
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}
