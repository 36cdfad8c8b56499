//! Fixed-capacity circular byte storage.
//!
//! Two cursors index a fixed `Box<[u8]>`: `write` is the next slot to fill and
//! `read` is the next slot to consume. The ring is empty when they are equal,
//! so at most `capacity - 1` bytes are ever resident.
//!
//! # Invariants
//! - `write < capacity` and `read < capacity`.
//! - `occupied() == (capacity + write - read) % capacity`.
//!
//! [`ByteRing::write`] does not check for overflow; writing into a full ring
//! wraps over unread bytes. Callers guard with [`ByteRing::is_full`].

pub struct ByteRing {
    storage: Box<[u8]>,
    write: usize,
    read: usize,
}

impl ByteRing {
    /// Creates an empty, zero-filled ring.
    ///
    /// # Panics
    /// Panics if `capacity < 2`.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity >= 2, "ByteRing capacity must be >= 2");
        Self {
            storage: vec![0u8; capacity].into_boxed_slice(),
            write: 0,
            read: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Store `byte` at the write cursor and advance it.
    pub fn write(&mut self, byte: u8) {
        self.storage[self.write] = byte;
        self.write = (self.write + 1) % self.storage.len();
    }

    /// The byte at the read cursor, if any.
    pub fn peek(&self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        Some(self.storage[self.read])
    }

    /// Remove and return the byte at the read cursor.
    pub fn consume(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.read = (self.read + 1) % self.storage.len();
        Some(byte)
    }

    pub fn is_empty(&self) -> bool {
        self.write == self.read
    }

    pub fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// Bytes written but not yet consumed.
    pub fn occupied(&self) -> usize {
        let cap = self.storage.len();
        (cap + self.write - self.read) % cap
    }

    /// Bytes that can still be written without overwriting unread data.
    pub fn free(&self) -> usize {
        self.storage.len() - 1 - self.occupied()
    }

    pub fn write_cursor(&self) -> usize {
        self.write
    }

    pub fn read_cursor(&self) -> usize {
        self.read
    }

    /// Raw storage, including stale bytes outside the occupied region.
    pub fn as_slice(&self) -> &[u8] {
        &self.storage
    }

    /// Zero the storage and rewind both cursors.
    pub fn reset(&mut self) {
        self.storage.fill(0);
        self.write = 0;
        self.read = 0;
    }
}

impl std::fmt::Debug for ByteRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteRing")
            .field("capacity", &self.capacity())
            .field("write", &self.write)
            .field("read", &self.read)
            .field("occupied", &self.occupied())
            .finish()
    }
}
