//! Message framing over serial-style byte links.
//!
//! embring turns the byte stream coming off a serial link into complete
//! tag-length messages using a fixed-capacity ring buffer that counts finished
//! messages as they arrive.
//!
//! # Crate Structure
//!
//! - [`transport`]: the `Transport` capability plus in-memory and Unix-socket links
//! - [`frame`]: ring storage, tag/length decoding, wire-type catalogs, `SerialBuffer`
//!
//! ```
//! use embring::frame::{DataType, SerialBuffer};
//! use embring::transport::MemoryTransport;
//!
//! let link = MemoryTransport::with_bytes(&[DataType::UINT8, 0x2A, DataType::END_OF_MESSAGE]);
//! let mut buffer = SerialBuffer::new(link);
//!
//! buffer.ingest_available().unwrap();
//! assert_eq!(buffer.pending_messages(), 1);
//!
//! let message = buffer.read_message().unwrap().unwrap();
//! assert_eq!(message.as_ref(), &[0xCC, 0x2A, 0xC1]);
//! ```

/// Re-export transport types.
pub mod transport {
    pub use embring_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use embring_frame::*;
}
