use bytes::{BufMut, BytesMut};

use crate::catalog::WireCatalog;
use crate::error::{FrameError, Result, Side};

/// Append one field (tag followed by its raw payload) to `dst`.
///
/// The payload length must match what the catalog assigns to `tag`. Values are
/// not interpreted; callers pass payload bytes already in wire order.
///
/// ```text
/// ┌──────────┬──────────────────────────────┐
/// │ Tag (1B) │ Payload (payload_len(tag) B) │
/// └──────────┴──────────────────────────────┘
/// ```
pub fn encode_field<C: WireCatalog + ?Sized>(
    catalog: &C,
    tag: u8,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    let expected = catalog.payload_len(tag).ok_or(FrameError::UnknownTag {
        tag,
        side: Side::Ingest,
    })?;
    if payload.len() != expected {
        return Err(FrameError::PayloadLength {
            tag,
            expected,
            actual: payload.len(),
        });
    }
    dst.reserve(1 + payload.len());
    dst.put_u8(tag);
    dst.put_slice(payload);
    Ok(())
}

/// Append the end-of-message sentinel to `dst`.
pub fn encode_end_of_message<C: WireCatalog + ?Sized>(catalog: &C, dst: &mut BytesMut) {
    dst.put_u8(catalog.end_of_message());
}

/// Split a raw byte sequence into fields, returning `(tag, payload)` slices.
///
/// Used for diagnostics on complete messages. A trailing field whose payload is
/// cut short is returned with the bytes that are present.
pub fn split_fields<'a, C: WireCatalog + ?Sized>(
    catalog: &C,
    bytes: &'a [u8],
) -> Result<Vec<(u8, &'a [u8])>> {
    let mut fields = Vec::new();
    let mut offset = 0usize;
    while offset < bytes.len() {
        let tag = bytes[offset];
        let len = catalog.payload_len(tag).ok_or(FrameError::UnknownTag {
            tag,
            side: Side::Consume,
        })?;
        let start = offset + 1;
        let end = (start + len).min(bytes.len());
        fields.push((tag, &bytes[start..end]));
        offset = end;
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DataType, StandardCatalog};

    #[test]
    fn encode_fields_and_sentinel() {
        let mut wire = BytesMut::new();
        encode_field(&StandardCatalog, DataType::UINT16, &[0x01, 0x02], &mut wire).unwrap();
        encode_field(&StandardCatalog, 0x05, &[], &mut wire).unwrap();
        encode_end_of_message(&StandardCatalog, &mut wire);

        assert_eq!(
            wire.as_ref(),
            &[DataType::UINT16, 0x01, 0x02, 0x05, DataType::END_OF_MESSAGE]
        );
    }

    #[test]
    fn encode_rejects_wrong_payload_length() {
        let mut wire = BytesMut::new();
        let err = encode_field(&StandardCatalog, DataType::UINT32, &[1, 2], &mut wire).unwrap_err();
        assert!(matches!(
            err,
            FrameError::PayloadLength {
                expected: 4,
                actual: 2,
                ..
            }
        ));
        assert!(wire.is_empty());
    }

    #[test]
    fn encode_rejects_unknown_tag() {
        let mut wire = BytesMut::new();
        let err = encode_field(&StandardCatalog, 0xC5, &[], &mut wire).unwrap_err();
        assert!(matches!(err, FrameError::UnknownTag { tag: 0xC5, .. }));
    }

    #[test]
    fn split_fields_walks_message() {
        let bytes = [DataType::INT8, 0xFE, 0x03, DataType::END_OF_MESSAGE];
        let fields = split_fields(&StandardCatalog, &bytes).unwrap();
        assert_eq!(
            fields,
            vec![
                (DataType::INT8, &[0xFE][..]),
                (0x03, &[][..]),
                (DataType::END_OF_MESSAGE, &[][..]),
            ]
        );
    }

    #[test]
    fn split_fields_keeps_truncated_tail() {
        let bytes = [DataType::UINT32, 0xAA];
        let fields = split_fields(&StandardCatalog, &bytes).unwrap();
        assert_eq!(fields, vec![(DataType::UINT32, &[0xAA][..])]);
    }
}
