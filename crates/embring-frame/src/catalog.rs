//! Wire-type catalogs.
//!
//! Every field on the wire starts with a one-byte tag. The catalog says how many
//! payload bytes follow that tag and which tag terminates a message. The framing
//! layer never looks at payload values, only at these lengths.

/// Maps one-byte tags to payload lengths.
pub trait WireCatalog {
    /// Payload bytes following `tag`, or `None` if the tag is not recognized.
    fn payload_len(&self, tag: u8) -> Option<usize>;

    /// The zero-length tag that marks the end of a message.
    fn end_of_message(&self) -> u8;

    /// The tag a decoder reports while idle between fields.
    fn null(&self) -> u8;
}

impl<C: WireCatalog + ?Sized> WireCatalog for &C {
    fn payload_len(&self, tag: u8) -> Option<usize> {
        (**self).payload_len(tag)
    }

    fn end_of_message(&self) -> u8 {
        (**self).end_of_message()
    }

    fn null(&self) -> u8 {
        (**self).null()
    }
}

/// Field types of the standard device protocol.
///
/// Tag values follow the MessagePack layout: small integers are packed into the
/// tag itself, everything else carries a fixed-width big-endian payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    PosFixInt(u8),
    NegFixInt(i8),
    Null,
    EndOfMessage,
    BoolFalse,
    BoolTrue,
    Float32,
    Float64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
}

impl DataType {
    pub const NULL: u8 = 0xC0;
    pub const END_OF_MESSAGE: u8 = 0xC1;
    pub const BOOL_FALSE: u8 = 0xC2;
    pub const BOOL_TRUE: u8 = 0xC3;
    pub const FLOAT32: u8 = 0xCA;
    pub const FLOAT64: u8 = 0xCB;
    pub const UINT8: u8 = 0xCC;
    pub const UINT16: u8 = 0xCD;
    pub const UINT32: u8 = 0xCE;
    pub const UINT64: u8 = 0xCF;
    pub const INT8: u8 = 0xD0;
    pub const INT16: u8 = 0xD1;
    pub const INT32: u8 = 0xD2;
    pub const INT64: u8 = 0xD3;

    /// Classify a tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        let ty = match tag {
            0x00..=0x7F => DataType::PosFixInt(tag),
            0xE0..=0xFF => DataType::NegFixInt(tag as i8),
            Self::NULL => DataType::Null,
            Self::END_OF_MESSAGE => DataType::EndOfMessage,
            Self::BOOL_FALSE => DataType::BoolFalse,
            Self::BOOL_TRUE => DataType::BoolTrue,
            Self::FLOAT32 => DataType::Float32,
            Self::FLOAT64 => DataType::Float64,
            Self::UINT8 => DataType::Uint8,
            Self::UINT16 => DataType::Uint16,
            Self::UINT32 => DataType::Uint32,
            Self::UINT64 => DataType::Uint64,
            Self::INT8 => DataType::Int8,
            Self::INT16 => DataType::Int16,
            Self::INT32 => DataType::Int32,
            Self::INT64 => DataType::Int64,
            _ => return None,
        };
        Some(ty)
    }

    /// The tag byte that encodes this type.
    ///
    /// Fixint values must lie in `0..=0x7F` and `-32..=-1`.
    pub fn tag(self) -> u8 {
        match self {
            DataType::PosFixInt(v) => {
                debug_assert!(v <= 0x7F, "positive fixint out of range: {v}");
                v & 0x7F
            }
            DataType::NegFixInt(v) => {
                debug_assert!((-32..0).contains(&v), "negative fixint out of range: {v}");
                (v as u8) | 0xE0
            }
            DataType::Null => Self::NULL,
            DataType::EndOfMessage => Self::END_OF_MESSAGE,
            DataType::BoolFalse => Self::BOOL_FALSE,
            DataType::BoolTrue => Self::BOOL_TRUE,
            DataType::Float32 => Self::FLOAT32,
            DataType::Float64 => Self::FLOAT64,
            DataType::Uint8 => Self::UINT8,
            DataType::Uint16 => Self::UINT16,
            DataType::Uint32 => Self::UINT32,
            DataType::Uint64 => Self::UINT64,
            DataType::Int8 => Self::INT8,
            DataType::Int16 => Self::INT16,
            DataType::Int32 => Self::INT32,
            DataType::Int64 => Self::INT64,
        }
    }

    /// Payload bytes that follow the tag.
    pub fn payload_len(self) -> usize {
        match self {
            DataType::PosFixInt(_)
            | DataType::NegFixInt(_)
            | DataType::Null
            | DataType::EndOfMessage
            | DataType::BoolFalse
            | DataType::BoolTrue => 0,
            DataType::Uint8 | DataType::Int8 => 1,
            DataType::Uint16 | DataType::Int16 => 2,
            DataType::Float32 | DataType::Uint32 | DataType::Int32 => 4,
            DataType::Float64 | DataType::Uint64 | DataType::Int64 => 8,
        }
    }

    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            DataType::PosFixInt(_) => "posfixint",
            DataType::NegFixInt(_) => "negfixint",
            DataType::Null => "null",
            DataType::EndOfMessage => "end",
            DataType::BoolFalse => "false",
            DataType::BoolTrue => "true",
            DataType::Float32 => "f32",
            DataType::Float64 => "f64",
            DataType::Uint8 => "u8",
            DataType::Uint16 => "u16",
            DataType::Uint32 => "u32",
            DataType::Uint64 => "u64",
            DataType::Int8 => "i8",
            DataType::Int16 => "i16",
            DataType::Int32 => "i32",
            DataType::Int64 => "i64",
        }
    }
}

/// The [`DataType`] table as a [`WireCatalog`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCatalog;

impl WireCatalog for StandardCatalog {
    fn payload_len(&self, tag: u8) -> Option<usize> {
        DataType::from_tag(tag).map(DataType::payload_len)
    }

    fn end_of_message(&self) -> u8 {
        DataType::END_OF_MESSAGE
    }

    fn null(&self) -> u8 {
        DataType::NULL
    }
}

/// A catalog built from an explicit tag table.
///
/// The end-of-message tag is always registered with a zero-length payload.
#[derive(Clone)]
pub struct TableCatalog {
    lengths: [Option<usize>; 256],
    end_of_message: u8,
    null: u8,
}

impl TableCatalog {
    pub fn new(end_of_message: u8, null: u8) -> Self {
        let mut lengths = [None; 256];
        lengths[end_of_message as usize] = Some(0);
        Self {
            lengths,
            end_of_message,
            null,
        }
    }

    /// Register `tag` with a payload of `len` bytes.
    ///
    /// Re-registering the end-of-message tag is ignored.
    pub fn with_tag(mut self, tag: u8, len: usize) -> Self {
        if tag != self.end_of_message {
            self.lengths[tag as usize] = Some(len);
        }
        self
    }
}

impl std::fmt::Debug for TableCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let known = self.lengths.iter().filter(|len| len.is_some()).count();
        f.debug_struct("TableCatalog")
            .field("tags", &known)
            .field("end_of_message", &self.end_of_message)
            .field("null", &self.null)
            .finish()
    }
}

impl WireCatalog for TableCatalog {
    fn payload_len(&self, tag: u8) -> Option<usize> {
        self.lengths[tag as usize]
    }

    fn end_of_message(&self) -> u8 {
        self.end_of_message
    }

    fn null(&self) -> u8 {
        self.null
    }
}
