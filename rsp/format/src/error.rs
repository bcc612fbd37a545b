use thiserror::Error;

use rsp_core::TlvError;

/**
    Errors from building or parsing certificate, CRT and APDU payloads.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    // ── TLV (delegated to rsp-core) ───────────────────────────────────
    #[error(transparent)]
    Tlv(#[from] TlvError),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    // ── Certificate ───────────────────────────────────────────────────
    #[error("certificate is missing {0}")]
    MissingField(&'static str),
    #[error("{0} trailing bytes after certificate")]
    TrailingData(usize),
    #[error("key usage must be 2 bytes, got {0}")]
    InvalidKeyUsage(usize),
    #[error("invalid BCD date {0}")]
    InvalidDate(String),
    #[error("invalid public key template: {0}")]
    InvalidPublicKey(String),

    // ── Key establishment ─────────────────────────────────────────────
    #[error("invalid control reference template: {0}")]
    InvalidCrt(String),
    #[error("unknown key type 0x{0:02X}")]
    UnknownKeyType(u8),
    #[error("unknown key usage qualifier 0x{0:02X}")]
    UnknownKeyQualifier(u8),

    // ── APDU ──────────────────────────────────────────────────────────
    #[error("AID must be 5 to 16 bytes, got {0}")]
    InvalidAid(usize),
    #[error("APDU data too long ({0} bytes)")]
    ApduTooLong(usize),
    #[error("invalid response APDU: {0}")]
    InvalidResponse(String),
}

impl From<hex::FromHexError> for FormatError {
    fn from(e: hex::FromHexError) -> Self {
        Self::InvalidHex(e.to_string())
    }
}

pub type FormatResult<T> = std::result::Result<T, FormatError>;
