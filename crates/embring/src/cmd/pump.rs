use bytes::Bytes;
use embring_frame::{FrameError, SerialBuffer, WireCatalog};
use embring_transport::Transport;

/// Ingest whatever the link has ready and hand every complete message to
/// `on_message`.
///
/// When the ring fills up, complete messages are drained to make room and
/// ingest resumes. A full ring with no complete message in it means a single
/// message is larger than the ring; that overflow is returned to the caller.
/// Messages completed before a framing error are delivered before the error
/// is returned.
/// Returns the number of messages delivered.
pub fn pump<T, C, F>(buffer: &mut SerialBuffer<T, C>, mut on_message: F) -> Result<usize, FrameError>
where
    T: Transport,
    C: WireCatalog,
    F: FnMut(Bytes),
{
    let mut delivered = 0usize;
    loop {
        let ingested = buffer.ingest_available();

        let mut drained = 0usize;
        while buffer.pending_messages() > 0 {
            match buffer.read_message()? {
                Some(message) => {
                    on_message(message);
                    drained += 1;
                }
                None => break,
            }
        }
        delivered += drained;

        match ingested {
            Ok(_) => return Ok(delivered),
            Err(FrameError::Overflow { .. }) if drained > 0 => continue,
            Err(err) => return Err(err),
        }
    }
}
