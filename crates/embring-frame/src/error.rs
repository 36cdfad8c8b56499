use embring_transport::TransportError;

/// Which decoder observed a framing problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Producer side, classifying bytes as they arrive from the transport.
    Ingest,
    /// Consumer side, classifying bytes as they are read out of the ring.
    Consume,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Ingest => f.write_str("ingest"),
            Side::Consume => f.write_str("consume"),
        }
    }
}

/// Errors that can occur while framing a byte stream.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A read or peek was attempted on an empty ring.
    #[error("ring buffer is empty")]
    Empty,

    /// The ring has no free slot for the next incoming byte.
    #[error("ring buffer full ({capacity} slots); drain before ingesting more")]
    Overflow { capacity: usize },

    /// A tag byte is not part of the wire-type catalog.
    #[error("unrecognized tag 0x{tag:02X} on {side} side")]
    UnknownTag { tag: u8, side: Side },

    /// The consumer crossed an end-of-message boundary that the producer never counted.
    #[error("end-of-message consumed with no pending messages")]
    CounterUnderflow,

    /// A previous framing error left the stream out of sync; call `reset`.
    #[error("framing desynchronized; reset required")]
    Desynchronized,

    /// The configured ring capacity is outside the supported range.
    #[error("invalid ring capacity {capacity} (must be between 2 and {max})")]
    InvalidCapacity { capacity: usize, max: usize },

    /// A field payload does not match the length the catalog assigns to its tag.
    #[error("tag 0x{tag:02X} expects {expected} payload bytes, got {actual}")]
    PayloadLength {
        tag: u8,
        expected: usize,
        actual: usize,
    },

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl FrameError {
    /// True if this error leaves the buffer desynchronized until reset.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            FrameError::UnknownTag { .. } | FrameError::CounterUnderflow | FrameError::Desynchronized
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
