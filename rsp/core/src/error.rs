use thiserror::Error;

use crate::tlv::Tag;

/**
    Errors from BER-TLV and DGI decoding and encoding.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TlvError {
    /// A length byte in 0x80..=0xFE that is not one of the 0x81/0x82/0x83 prefixes.
    #[error("malformed BER length byte 0x{0:02X}")]
    MalformedLength(u8),

    /// Length byte 0xFF, which BER-TLV reserves.
    #[error("length byte 0xFF is not used in BER-TLV")]
    UnusedLength,

    #[error("truncated input: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("unexpected tag {actual}, expected {expected}")]
    UnexpectedTag { expected: Tag, actual: Tag },

    #[error("length {0} exceeds the encodable maximum")]
    LengthTooLarge(usize),
}

/**
    Error returned by `FromStr` implementations on enum types.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}
