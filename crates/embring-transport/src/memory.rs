use std::collections::VecDeque;
use std::io::ErrorKind;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// In-memory link with a scripted receive queue.
///
/// Bytes handed to [`MemoryTransport::feed`] become readable; bytes written
/// through [`Transport::write_bytes`] are collected and can be taken back with
/// [`MemoryTransport::take_written`].
#[derive(Debug, Default)]
pub struct MemoryTransport {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    pending_error: Option<ErrorKind>,
    disconnected: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport whose receive queue already holds `bytes`.
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let mut transport = Self::new();
        transport.feed(bytes);
        transport
    }

    /// Queue bytes as if they had just arrived on the wire.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Number of received bytes not yet read.
    pub fn queued(&self) -> usize {
        self.rx.len()
    }

    /// Drain everything written to the link so far.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }

    /// Make the next transport call fail with an I/O error of `kind`.
    pub fn fail_next(&mut self, kind: ErrorKind) {
        self.pending_error = Some(kind);
    }

    /// Close the link; queued bytes stay readable, then the link reports disconnection.
    pub fn disconnect(&mut self) {
        self.disconnected = true;
    }

    fn take_error(&mut self) -> Result<()> {
        match self.pending_error.take() {
            Some(kind) => Err(TransportError::Io(std::io::Error::from(kind))),
            None => Ok(()),
        }
    }
}

impl Transport for MemoryTransport {
    fn bytes_available(&mut self) -> Result<usize> {
        self.take_error()?;
        if self.rx.is_empty() && self.disconnected {
            return Err(TransportError::Disconnected);
        }
        Ok(self.rx.len())
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.take_error()?;
        if self.rx.is_empty() && self.disconnected {
            return Err(TransportError::Disconnected);
        }
        let n = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.take_error()?;
        if self.disconnected {
            return Err(TransportError::Disconnected);
        }
        self.tx.extend_from_slice(buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_then_read() {
        let mut transport = MemoryTransport::with_bytes(&[1, 2, 3]);
        assert_eq!(transport.bytes_available().unwrap(), 3);

        let mut buf = [0u8; 2];
        assert_eq!(transport.read_into(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(transport.queued(), 1);
    }

    #[test]
    fn writes_are_collected() {
        let mut transport = MemoryTransport::new();
        transport.write_bytes(&[0xC1]).unwrap();
        transport.write_bytes(&[0x05, 0xC1]).unwrap();
        assert_eq!(transport.take_written(), vec![0xC1, 0x05, 0xC1]);
        assert!(transport.take_written().is_empty());
    }

    #[test]
    fn injected_error_fires_once() {
        let mut transport = MemoryTransport::with_bytes(&[7]);
        transport.fail_next(ErrorKind::BrokenPipe);

        let err = transport.bytes_available().unwrap_err();
        assert!(matches!(err, TransportError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
        assert_eq!(transport.bytes_available().unwrap(), 1);
    }

    #[test]
    fn disconnect_after_drain() {
        let mut transport = MemoryTransport::with_bytes(&[9]);
        transport.disconnect();

        assert_eq!(transport.bytes_available().unwrap(), 1);
        let mut buf = [0u8; 1];
        transport.read_into(&mut buf).unwrap();
        assert!(matches!(
            transport.bytes_available(),
            Err(TransportError::Disconnected)
        ));
        assert!(matches!(
            transport.write_bytes(&[1]),
            Err(TransportError::Disconnected)
        ));
    }
}
