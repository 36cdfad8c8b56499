use bytes::{BufMut, Bytes, BytesMut};
use embring_transport::Transport;
use tracing::{debug, trace, warn};

use crate::catalog::{StandardCatalog, WireCatalog};
use crate::decode::{DecodeState, Step};
use crate::error::{FrameError, Result, Side};
use crate::ring::ByteRing;

/// Default ring capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 64;

/// Largest ring capacity accepted by [`BufferConfig::validate`].
pub const MAX_CAPACITY: usize = 64 * 1024;

const DUMP_ROW_WIDTH: usize = 16;

/// Configuration for a [`SerialBuffer`].
#[derive(Debug, Clone)]
pub struct BufferConfig {
    /// Ring size in bytes. One slot is always kept free, so at most
    /// `capacity - 1` bytes are buffered. Default: 64.
    pub capacity: usize,
}

impl BufferConfig {
    /// Check that the capacity is within `2..=MAX_CAPACITY`.
    pub fn validate(&self) -> Result<()> {
        if self.capacity < 2 || self.capacity > MAX_CAPACITY {
            return Err(FrameError::InvalidCapacity {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            });
        }
        Ok(())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Ring buffer that frames a tag-length byte stream into messages.
///
/// Bytes are pulled from the transport by [`SerialBuffer::ingest_available`]
/// and classified as they land in the ring; every end-of-message sentinel bumps
/// the pending-message count. [`SerialBuffer::read_byte`] runs the same
/// classification on the way out and decrements the count, so callers know a
/// full message is ready without scanning the ring.
///
/// Not synchronized: ingest and consume must be driven from one thread, or the
/// whole buffer wrapped in a lock.
///
/// An unknown tag on ingest halts ingest, but messages completed before it can
/// still be read. Once they are drained, or after any consume-side framing
/// error, every operation fails with [`FrameError::Desynchronized`] until
/// [`SerialBuffer::reset`].
pub struct SerialBuffer<T, C = StandardCatalog> {
    transport: T,
    catalog: C,
    ring: ByteRing,
    ingest: DecodeState,
    consume: DecodeState,
    pending: usize,
    sync: SyncState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    InSync,
    /// Ingest hit a framing error; counted messages are still readable.
    IngestHalted,
    Lost,
}

impl<T: Transport> SerialBuffer<T, StandardCatalog> {
    /// Create a buffer with the standard catalog and default configuration.
    pub fn new(transport: T) -> Self {
        Self::build(transport, StandardCatalog, DEFAULT_CAPACITY)
    }

    /// Create a buffer with the standard catalog and explicit configuration.
    pub fn with_config(transport: T, config: BufferConfig) -> Result<Self> {
        Self::with_catalog(transport, StandardCatalog, config)
    }
}

impl<T: Transport, C: WireCatalog> SerialBuffer<T, C> {
    /// Create a buffer with a custom wire-type catalog.
    pub fn with_catalog(transport: T, catalog: C, config: BufferConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(transport, catalog, config.capacity))
    }

    fn build(transport: T, catalog: C, capacity: usize) -> Self {
        let null = catalog.null();
        Self {
            transport,
            catalog,
            ring: ByteRing::with_capacity(capacity),
            ingest: DecodeState::idle(Side::Ingest, null),
            consume: DecodeState::idle(Side::Consume, null),
            pending: 0,
            sync: SyncState::InSync,
        }
    }

    /// Send one byte straight to the transport. Outgoing bytes bypass the ring.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_bytes(&[byte])
    }

    /// Send bytes straight to the transport.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.transport.write_bytes(bytes)?;
        Ok(())
    }

    /// Pull every byte the transport has ready into the ring.
    ///
    /// Returns how many bytes were ingested. Decoder state carries over between
    /// calls, so a field split across two calls is still framed correctly.
    ///
    /// Stops with [`FrameError::Overflow`] when the ring is full; the remaining
    /// bytes stay queued in the transport and nothing buffered is overwritten.
    /// Bytes ingested before an error stay in the ring and are counted.
    pub fn ingest_available(&mut self) -> Result<usize> {
        if self.sync != SyncState::InSync {
            return Err(FrameError::Desynchronized);
        }

        let mut ingested = 0usize;
        while self.transport.bytes_available()? > 0 {
            if self.ring.is_full() {
                debug!(
                    capacity = self.ring.capacity(),
                    pending = self.pending,
                    "ring full; deferring ingest"
                );
                return Err(FrameError::Overflow {
                    capacity: self.ring.capacity(),
                });
            }

            let mut byte = [0u8; 1];
            if self.transport.read_into(&mut byte)? == 0 {
                break;
            }
            self.ring.write(byte[0]);
            ingested += 1;

            match self.ingest.step(byte[0], &self.catalog) {
                Ok(Step::EndOfMessage) => self.pending += 1,
                Ok(_) => {}
                Err(err) => return Err(self.desynchronize(SyncState::IngestHalted, err)),
            }
        }

        if ingested > 0 {
            trace!(ingested, pending = self.pending, "ingested bytes");
        }
        Ok(ingested)
    }

    /// The next unread byte, without consuming it.
    pub fn peek(&self) -> Result<u8> {
        self.ring.peek().ok_or(FrameError::Empty)
    }

    /// Consume the next byte, keeping the pending-message count in step.
    pub fn read_byte(&mut self) -> Result<u8> {
        self.consume_step().map(|(byte, _)| byte)
    }

    /// Consume one complete message, sentinel included.
    ///
    /// Returns `Ok(None)` when no complete message is buffered.
    pub fn read_message(&mut self) -> Result<Option<Bytes>> {
        self.ensure_readable()?;
        if self.pending == 0 {
            return Ok(None);
        }

        let mut message = BytesMut::with_capacity(self.ring.occupied());
        loop {
            let (byte, boundary) = self.consume_step()?;
            message.put_u8(byte);
            if boundary {
                return Ok(Some(message.freeze()));
            }
        }
    }

    fn consume_step(&mut self) -> Result<(u8, bool)> {
        self.ensure_readable()?;
        let byte = self.ring.consume().ok_or(FrameError::Empty)?;

        match self.consume.step(byte, &self.catalog) {
            Ok(Step::EndOfMessage) => {
                if self.pending == 0 {
                    return Err(self.desynchronize(SyncState::Lost, FrameError::CounterUnderflow));
                }
                self.pending -= 1;
                Ok((byte, true))
            }
            Ok(_) => Ok((byte, false)),
            Err(err) => Err(self.desynchronize(SyncState::Lost, err)),
        }
    }

    /// After ingest halts, reads stay valid up to the last counted sentinel.
    fn ensure_readable(&self) -> Result<()> {
        match self.sync {
            SyncState::InSync => Ok(()),
            SyncState::IngestHalted if self.pending > 0 => Ok(()),
            _ => Err(FrameError::Desynchronized),
        }
    }

    fn desynchronize(&mut self, state: SyncState, err: FrameError) -> FrameError {
        warn!(error = %err, pending = self.pending, "framing desynchronized");
        self.sync = state;
        err
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Bytes buffered but not yet read.
    pub fn occupied(&self) -> usize {
        self.ring.occupied()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Complete messages buffered and not yet fully read.
    pub fn pending_messages(&self) -> usize {
        self.pending
    }

    /// True after a framing error until the next [`SerialBuffer::reset`].
    pub fn is_desynchronized(&self) -> bool {
        self.sync != SyncState::InSync
    }

    pub fn ingest_state(&self) -> &DecodeState {
        &self.ingest
    }

    pub fn consume_state(&self) -> &DecodeState {
        &self.consume
    }

    /// Clear storage, cursors, decoder states and the message count.
    pub fn reset(&mut self) {
        debug!(
            occupied = self.ring.occupied(),
            pending = self.pending,
            "resetting serial buffer"
        );
        let null = self.catalog.null();
        self.ring.reset();
        self.ingest.reset(null);
        self.consume.reset(null);
        self.pending = 0;
        self.sync = SyncState::InSync;
    }

    /// Render raw storage as rows of 16 hex bytes.
    pub fn dump(&self) -> String {
        dump_rows(self.ring.as_slice())
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the buffer and return the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}

impl<T, C> std::fmt::Debug for SerialBuffer<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialBuffer")
            .field("ring", &self.ring)
            .field("ingest", &self.ingest)
            .field("consume", &self.consume)
            .field("pending", &self.pending)
            .field("sync", &self.sync)
            .finish()
    }
}

fn dump_rows(storage: &[u8]) -> String {
    storage
        .chunks(DUMP_ROW_WIDTH)
        .map(|row| {
            row.iter()
                .map(|byte| hex::encode_upper([*byte]))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
