use crate::catalog::WireCatalog;
use crate::error::{FrameError, Result, Side};

/// What a single byte turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A tag byte; `payload_len` bytes of payload follow.
    Tag { tag: u8, payload_len: usize },
    /// A payload byte; `remaining` more are expected for the current field.
    Payload { remaining: usize },
    /// The byte completed an end-of-message field.
    EndOfMessage,
}

/// Tag/length state machine for one side of the ring.
///
/// Idle means `remaining == 0`: the next byte is read as a tag. Otherwise the
/// next byte is payload and only decrements `remaining`. The producer and the
/// consumer each own one of these and feed it the same byte sequence, so both
/// agree on where message boundaries fall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeState {
    side: Side,
    tag: u8,
    remaining: usize,
}

impl DecodeState {
    /// An idle decoder whose current tag is `null`.
    pub fn idle(side: Side, null: u8) -> Self {
        Self {
            side,
            tag: null,
            remaining: 0,
        }
    }

    /// Classify `byte` and advance.
    ///
    /// Fails with [`FrameError::UnknownTag`] when a tag byte is not in the
    /// catalog; the state is left untouched in that case.
    pub fn step<C: WireCatalog + ?Sized>(&mut self, byte: u8, catalog: &C) -> Result<Step> {
        let step = if self.remaining == 0 {
            let payload_len = catalog.payload_len(byte).ok_or(FrameError::UnknownTag {
                tag: byte,
                side: self.side,
            })?;
            self.tag = byte;
            self.remaining = payload_len;
            Step::Tag {
                tag: byte,
                payload_len,
            }
        } else {
            self.remaining -= 1;
            Step::Payload {
                remaining: self.remaining,
            }
        };

        if self.remaining == 0 && self.tag == catalog.end_of_message() {
            return Ok(Step::EndOfMessage);
        }
        Ok(step)
    }

    pub fn is_idle(&self) -> bool {
        self.remaining == 0
    }

    /// Tag of the field being decoded, or of the last field once it completed.
    pub fn current_tag(&self) -> u8 {
        self.tag
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn reset(&mut self, null: u8) {
        self.tag = null;
        self.remaining = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DataType, StandardCatalog};

    #[test]
    fn tag_then_payload_then_idle() {
        let mut state = DecodeState::idle(Side::Ingest, DataType::NULL);

        assert_eq!(
            state.step(DataType::UINT16, &StandardCatalog).unwrap(),
            Step::Tag {
                tag: DataType::UINT16,
                payload_len: 2
            }
        );
        assert!(!state.is_idle());
        assert_eq!(
            state.step(0x12, &StandardCatalog).unwrap(),
            Step::Payload { remaining: 1 }
        );
        assert_eq!(
            state.step(0x34, &StandardCatalog).unwrap(),
            Step::Payload { remaining: 0 }
        );
        assert!(state.is_idle());
        assert_eq!(state.current_tag(), DataType::UINT16);
    }

    #[test]
    fn end_of_message_fires_on_sentinel() {
        let mut state = DecodeState::idle(Side::Consume, DataType::NULL);
        assert_eq!(
            state.step(DataType::END_OF_MESSAGE, &StandardCatalog).unwrap(),
            Step::EndOfMessage
        );
        assert!(state.is_idle());
    }

    #[test]
    fn sentinel_value_inside_payload_is_not_a_boundary() {
        let mut state = DecodeState::idle(Side::Ingest, DataType::NULL);
        state.step(DataType::UINT8, &StandardCatalog).unwrap();
        assert_eq!(
            state.step(DataType::END_OF_MESSAGE, &StandardCatalog).unwrap(),
            Step::Payload { remaining: 0 }
        );
    }

    #[test]
    fn unknown_tag_reports_side_and_keeps_state() {
        let mut state = DecodeState::idle(Side::Consume, DataType::NULL);
        let err = state.step(0xC4, &StandardCatalog).unwrap_err();
        assert!(matches!(
            err,
            FrameError::UnknownTag {
                tag: 0xC4,
                side: Side::Consume
            }
        ));
        assert_eq!(state, DecodeState::idle(Side::Consume, DataType::NULL));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut state = DecodeState::idle(Side::Ingest, DataType::NULL);
        state.step(DataType::UINT64, &StandardCatalog).unwrap();
        state.reset(DataType::NULL);
        assert!(state.is_idle());
        assert_eq!(state.current_tag(), DataType::NULL);
    }
}
