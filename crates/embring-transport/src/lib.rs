//! Byte transport abstraction for serial-style links.
//!
//! The framing layer only needs three things from a link: how many bytes are
//! waiting, a way to pull some of them, and a way to push bytes out. That
//! capability is the [`Transport`] trait. Implementations provided here:
//! - [`MemoryTransport`]: scripted in-memory link for tests and offline replay
//! - [`SerialStream`]: a connected Unix domain socket standing in for a serial line
//!
//! This is the lowest layer of embring. Everything else builds on top of it.

pub mod error;
pub mod memory;
pub mod traits;

#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use memory::MemoryTransport;
pub use traits::Transport;

#[cfg(unix)]
pub use traits::SerialStream;
#[cfg(unix)]
pub use uds::UnixDomainSocket;
