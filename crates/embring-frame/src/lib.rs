//! Ring-buffer framing for tag-length byte streams.
//!
//! A serial-style link delivers one long byte stream. Each field in it is a
//! one-byte tag followed by a fixed number of payload bytes (looked up in a
//! [`WireCatalog`]), and a zero-length sentinel tag ends every message. The
//! [`SerialBuffer`] pulls bytes into a fixed-capacity ring as they arrive,
//! tracks field boundaries on both the producer and consumer side, and keeps a
//! count of complete messages so readers never have to scan ahead.

pub mod buffer;
pub mod catalog;
pub mod codec;
pub mod decode;
pub mod error;
pub mod ring;

pub use buffer::{BufferConfig, SerialBuffer, DEFAULT_CAPACITY, MAX_CAPACITY};
pub use catalog::{DataType, StandardCatalog, TableCatalog, WireCatalog};
pub use codec::{encode_end_of_message, encode_field, split_fields};
pub use decode::{DecodeState, Step};
pub use error::{FrameError, Result, Side};
pub use ring::ByteRing;
