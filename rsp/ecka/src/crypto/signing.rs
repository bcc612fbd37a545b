/*!
    ECDSA signing and verification.

    - Sign:   H(data) → ECDSA over the prehash (RFC 6979 nonces)
    - Verify: H(data) → ECDSA verify over the prehash

    H is chosen from the curve's field size, not from the curve crate's
    default digest:
    - field bits ≤ 383: SHA-256
    - field bits ≤ 511: SHA-384
    - otherwise:        SHA-512

    Signatures are emitted as DER or fixed-width `r ‖ s`. Verification
    accepts either form.
*/

use core::fmt;
use core::str::FromStr;

use ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use serde::Deserialize;
use sha2::{Digest, Sha256, Sha384, Sha512};

use rsp_core::{ParseError, eq_ignore_ascii_case, trim_ascii};

use crate::error::{EckaError, EckaResult};
use crate::keys::{PrivateKey, PublicKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const fn for_field_bits(bits: usize) -> Self {
        if bits <= 383 {
            Self::Sha256
        } else if bits <= 511 {
            Self::Sha384
        } else {
            Self::Sha512
        }
    }

    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

/**
    Wire form of produced signatures.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureEncoding {
    /// ASN.1 `SEQUENCE { r INTEGER, s INTEGER }`.
    #[default]
    Der,
    /// `r ‖ s`, each left-padded to the field size.
    Raw,
}

impl SignatureEncoding {
    pub const fn from_name(name: &[u8]) -> Option<Self> {
        let name = trim_ascii(name);
        match name.len() {
            3 if eq_ignore_ascii_case(name, b"der") => Some(Self::Der),
            3 if eq_ignore_ascii_case(name, b"raw") => Some(Self::Raw),
            _ => None,
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Der => "der",
            Self::Raw => "raw",
        }
    }
}

impl fmt::Display for SignatureEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for SignatureEncoding {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.as_bytes()).ok_or_else(|| ParseError {
            kind: "signature encoding",
            value: s.to_owned(),
        })
    }
}

macro_rules! sign_prehash {
    ($signer:expr, $sig:ty, $digest:expr, $encoding:expr) => {{
        let signature: $sig = $signer
            .sign_prehash($digest)
            .map_err(|e| EckaError::SigningFailed(e.to_string()))?;
        match $encoding {
            SignatureEncoding::Der => signature.to_der().as_bytes().to_vec(),
            SignatureEncoding::Raw => signature.to_bytes().to_vec(),
        }
    }};
}

macro_rules! verify_prehash {
    ($verifier:expr, $sig:ty, $digest:expr, $signature:expr) => {{
        <$sig>::from_der($signature)
            .or_else(|_| <$sig>::from_slice($signature))
            .is_ok_and(|s| $verifier.verify_prehash($digest, &s).is_ok())
    }};
}

/**
    Sign `data` with the hash selected for the key's curve.
*/
pub fn sign(key: &PrivateKey, data: &[u8], encoding: SignatureEncoding) -> EckaResult<Vec<u8>> {
    let digest = key.curve().signature_hash().digest(data);
    let signature = match key {
        PrivateKey::P256(k) => {
            let signer = p256::ecdsa::SigningKey::from(k);
            sign_prehash!(signer, p256::ecdsa::Signature, &digest, encoding)
        }
        PrivateKey::P384(k) => {
            let signer = p384::ecdsa::SigningKey::from(k);
            sign_prehash!(signer, p384::ecdsa::Signature, &digest, encoding)
        }
        PrivateKey::P521(k) => {
            let signer = p521::ecdsa::SigningKey::from_bytes(&k.to_bytes())
                .map_err(|e| EckaError::SigningFailed(e.to_string()))?;
            sign_prehash!(signer, p521::ecdsa::Signature, &digest, encoding)
        }
    };
    Ok(signature)
}

/**
    Verify a DER or raw signature over `data`.
*/
pub fn verify(key: &PublicKey, signature: &[u8], data: &[u8]) -> EckaResult<()> {
    let digest = key.curve().signature_hash().digest(data);
    let valid = match key {
        PublicKey::P256(k) => {
            let verifier = p256::ecdsa::VerifyingKey::from(k);
            verify_prehash!(verifier, p256::ecdsa::Signature, &digest, signature)
        }
        PublicKey::P384(k) => {
            let verifier = p384::ecdsa::VerifyingKey::from(k);
            verify_prehash!(verifier, p384::ecdsa::Signature, &digest, signature)
        }
        PublicKey::P521(k) => {
            let verifier = p521::ecdsa::VerifyingKey::from_affine(*k.as_affine())
                .map_err(|_| EckaError::InvalidPoint("not a valid P-521 verifying key".into()))?;
            verify_prehash!(verifier, p521::ecdsa::Signature, &digest, signature)
        }
    };
    if valid {
        Ok(())
    } else {
        Err(EckaError::SignatureInvalid)
    }
}
