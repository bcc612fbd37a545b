use core::fmt;

use thiserror::Error;

use rsp_core::TlvError;
use rsp_format::FormatError;

use crate::curves::Curve;

/**
    Errors from key agreement, certificate handling and key establishment.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EckaError {
    // ── Encoding (delegated to rsp-core / rsp-format) ─────────────────
    #[error(transparent)]
    Tlv(#[from] TlvError),
    #[error(transparent)]
    Format(#[from] FormatError),

    // ── Curves and keys ───────────────────────────────────────────────
    #[error("unknown key parameter reference 0x{0:02X}")]
    UnknownCurveReference(u8),
    #[error("no arithmetic backend for {0}")]
    UnsupportedCurve(Curve),
    #[error("public key curve is not in the registry")]
    UnregisteredCurve,
    #[error("keys are on different curves ({0} and {1})")]
    CurveMismatch(Curve, Curve),
    #[error("invalid EC point: {0}")]
    InvalidPoint(String),
    #[error("invalid EC scalar: {0}")]
    InvalidScalar(String),

    // ── ECDSA ─────────────────────────────────────────────────────────
    #[error("ECDSA signature verification failed")]
    SignatureInvalid,
    #[error("ECDSA signing failed: {0}")]
    SigningFailed(String),

    // ── KDF / CMAC ────────────────────────────────────────────────────
    #[error("key data length must be a positive multiple of 8 bits, got {0}")]
    InvalidKeyDataLength(usize),
    #[error("receipt key must be 16, 24 or 32 bytes, got {0}")]
    InvalidReceiptKey(usize),

    // ── Trust and establishment ───────────────────────────────────────
    #[error("certificate not trusted: {0}")]
    CertificateNotTrusted(TrustFailure),
    #[error("key establishment receipt mismatch")]
    ReceiptMismatch,
    #[error("session {0}")]
    SessionState(&'static str),

    // ── Configuration ─────────────────────────────────────────────────
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EckaError {
    /**
        Whether the error aborts the key establishment attempt. The caller
        has to start over with fresh ephemeral keys after a fatal error.
    */
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SignatureInvalid
                | Self::CertificateNotTrusted(_)
                | Self::ReceiptMismatch
                | Self::SessionState(_)
        )
    }
}

/**
    Why a certificate was rejected by the trust check.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustFailure {
    /// The CA key identifier does not name the configured CI key.
    IssuerMismatch,
    BadSignature,
    NotYetValid,
    Expired,
    Revoked,
}

impl fmt::Display for TrustFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::IssuerMismatch => "issuer does not match the CI key identifier",
            Self::BadSignature => "signature does not verify against the CI key",
            Self::NotYetValid => "certificate is not yet valid",
            Self::Expired => "certificate has expired",
            Self::Revoked => "certificate serial number is revoked",
        })
    }
}

pub type EckaResult<T> = std::result::Result<T, EckaError>;
