use std::fmt;
use std::io;

use embring_frame::FrameError;
use embring_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Bind { source, .. }
        | TransportError::Connect { source, .. }
        | TransportError::Accept(source)
        | TransportError::Io(source) => io_error(context, source),
        TransportError::Disconnected => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Transport(err) => transport_error(context, err),
        FrameError::InvalidCapacity { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        FrameError::Overflow { .. }
        | FrameError::UnknownTag { .. }
        | FrameError::CounterUnderflow
        | FrameError::Desynchronized
        | FrameError::PayloadLength { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::Empty => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_errors_are_data_invalid() {
        let err = frame_error(
            "replay failed",
            FrameError::UnknownTag {
                tag: 0xC7,
                side: embring_frame::Side::Ingest,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.contains("0xC7"));
    }

    #[test]
    fn transport_io_errors_map_by_kind() {
        let err = frame_error(
            "listen failed",
            FrameError::Transport(TransportError::Io(io::Error::from(
                io::ErrorKind::PermissionDenied,
            ))),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }

    #[test]
    fn bad_capacity_is_usage() {
        let err = frame_error(
            "config",
            FrameError::InvalidCapacity {
                capacity: 1,
                max: embring_frame::MAX_CAPACITY,
            },
        );
        assert_eq!(err.code, USAGE);
    }
}
