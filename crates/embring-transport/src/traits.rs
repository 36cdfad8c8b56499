use crate::error::Result;

/// A byte link the framing layer can poll.
///
/// Implementations must not block indefinitely in [`Transport::bytes_available`];
/// [`Transport::read_into`] is only ever asked for at most as many bytes as the
/// last availability probe reported.
pub trait Transport {
    /// Number of bytes that can be read right now without blocking.
    fn bytes_available(&mut self) -> Result<usize>;

    /// Read up to `buf.len()` bytes, returning how many were actually read.
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write every byte of `buf` to the link.
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn bytes_available(&mut self) -> Result<usize> {
        (**self).bytes_available()
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_into(buf)
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_bytes(buf)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn bytes_available(&mut self) -> Result<usize> {
        (**self).bytes_available()
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_into(buf)
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_bytes(buf)
    }
}

#[cfg(unix)]
pub use self::unix::SerialStream;

#[cfg(unix)]
mod unix {
    use std::io::{ErrorKind, Read, Write};
    use std::os::fd::AsRawFd;
    use std::os::unix::net::UnixStream;

    use super::Transport;
    use crate::error::{Result, TransportError};

    /// A connected stream socket used as a serial-style byte link.
    ///
    /// Availability is probed with `FIONREAD`, so polling never blocks even
    /// though reads and writes on the socket itself are blocking.
    pub struct SerialStream {
        inner: UnixStream,
    }

    impl SerialStream {
        pub(crate) fn from_unix(stream: UnixStream) -> Self {
            Self { inner: stream }
        }

        /// Create a connected pair of streams, like two ends of a null-modem cable.
        pub fn pair() -> Result<(Self, Self)> {
            let (left, right) = UnixStream::pair()?;
            Ok((Self::from_unix(left), Self::from_unix(right)))
        }

        fn queued_bytes(&self) -> Result<usize> {
            let fd = self.inner.as_raw_fd();
            let mut queued: libc::c_int = 0;

            // SAFETY: `queued` is a valid writable c_int and `fd` is an open socket
            // descriptor owned by this stream for the duration of the call.
            let rc = unsafe { libc::ioctl(fd, libc::FIONREAD, &mut queued as *mut libc::c_int) };
            if rc != 0 {
                return Err(std::io::Error::last_os_error().into());
            }
            Ok(queued.max(0) as usize)
        }

        fn peer_closed(&self) -> Result<bool> {
            let fd = self.inner.as_raw_fd();
            let mut probe = [0u8; 1];

            // SAFETY: `probe` is a valid one-byte buffer; MSG_PEEK leaves the
            // socket queue untouched and MSG_DONTWAIT keeps the call non-blocking.
            let rc = unsafe {
                libc::recv(
                    fd,
                    probe.as_mut_ptr().cast::<libc::c_void>(),
                    probe.len(),
                    libc::MSG_PEEK | libc::MSG_DONTWAIT,
                )
            };

            match rc {
                0 => Ok(true),
                n if n > 0 => Ok(false),
                _ => {
                    let err = std::io::Error::last_os_error();
                    match err.kind() {
                        ErrorKind::WouldBlock | ErrorKind::Interrupted => Ok(false),
                        _ => Err(err.into()),
                    }
                }
            }
        }
    }

    impl Transport for SerialStream {
        fn bytes_available(&mut self) -> Result<usize> {
            let queued = self.queued_bytes()?;
            if queued == 0 && self.peer_closed()? {
                return Err(TransportError::Disconnected);
            }
            Ok(queued)
        }

        fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
            if buf.is_empty() {
                return Ok(0);
            }
            loop {
                match self.inner.read(buf) {
                    Ok(0) => return Err(TransportError::Disconnected),
                    Ok(n) => return Ok(n),
                    Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                    Err(err) => return Err(err.into()),
                }
            }
        }

        fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
            let mut offset = 0usize;
            while offset < buf.len() {
                match self.inner.write(&buf[offset..]) {
                    Ok(0) => return Err(TransportError::Disconnected),
                    Ok(n) => offset += n,
                    Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                    Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                        return Err(TransportError::Disconnected)
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            self.inner.flush().map_err(Into::into)
        }
    }

    impl std::fmt::Debug for SerialStream {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("SerialStream").field("type", &"unix").finish()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn pair_reports_available_bytes() {
            let (mut left, mut right) = SerialStream::pair().unwrap();
            assert_eq!(right.bytes_available().unwrap(), 0);

            left.write_bytes(&[0xC1, 0x05, 0xC1]).unwrap();
            assert_eq!(right.bytes_available().unwrap(), 3);

            let mut buf = [0u8; 2];
            assert_eq!(right.read_into(&mut buf).unwrap(), 2);
            assert_eq!(buf, [0xC1, 0x05]);
            assert_eq!(right.bytes_available().unwrap(), 1);
        }

        #[test]
        fn closed_peer_is_disconnected_once_drained() {
            let (mut left, mut right) = SerialStream::pair().unwrap();
            left.write_bytes(&[0x01]).unwrap();
            drop(left);

            assert_eq!(right.bytes_available().unwrap(), 1);
            let mut buf = [0u8; 1];
            right.read_into(&mut buf).unwrap();

            let err = right.bytes_available().unwrap_err();
            assert!(matches!(err, TransportError::Disconnected));
        }

        #[test]
        fn empty_read_buffer_is_noop() {
            let (_left, mut right) = SerialStream::pair().unwrap();
            assert_eq!(right.read_into(&mut []).unwrap(), 0);
        }
    }
}
