/*!
    EC key types over the curves with an arithmetic backend, and their
    X9.62 / GlobalPlatform encodings.
*/

use core::fmt;

use p256::elliptic_curve::rand_core::{OsRng, RngCore};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use zeroize::Zeroizing;

use rsp_format::EncodedPublicKey;

use crate::curves::{Curve, CurveRegistry};
use crate::error::{EckaError, EckaResult};

#[derive(Clone, PartialEq, Eq)]
pub enum PublicKey {
    P256(p256::PublicKey),
    P384(p384::PublicKey),
    P521(p521::PublicKey),
}

impl PublicKey {
    pub const fn curve(&self) -> Curve {
        match self {
            Self::P256(_) => Curve::P256,
            Self::P384(_) => Curve::P384,
            Self::P521(_) => Curve::P521,
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PublicKey({}, {})",
            self.curve(),
            hex::encode_upper(encode_point(self))
        )
    }
}

/**
    An EC private key. The scalar is zeroized when the key is dropped.
*/
#[derive(Clone)]
pub enum PrivateKey {
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
}

impl PrivateKey {
    pub fn generate(curve: Curve) -> EckaResult<Self> {
        match curve {
            Curve::P256 => Ok(Self::P256(p256::SecretKey::random(&mut OsRng))),
            Curve::P384 => Ok(Self::P384(p384::SecretKey::random(&mut OsRng))),
            Curve::P521 => Ok(Self::P521(p521::SecretKey::random(&mut OsRng))),
            other => Err(EckaError::UnsupportedCurve(other)),
        }
    }

    pub const fn curve(&self) -> Curve {
        match self {
            Self::P256(_) => Curve::P256,
            Self::P384(_) => Curve::P384,
            Self::P521(_) => Curve::P521,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::P256(k) => PublicKey::P256(k.public_key()),
            Self::P384(k) => PublicKey::P384(k.public_key()),
            Self::P521(k) => PublicKey::P521(k.public_key()),
        }
    }

    /// Big-endian scalar, `coordinate_len` bytes.
    pub fn to_scalar_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(match self {
            Self::P256(k) => k.to_bytes().to_vec(),
            Self::P384(k) => k.to_bytes().to_vec(),
            Self::P521(k) => k.to_bytes().to_vec(),
        })
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({}, ..)", self.curve())
    }
}

/**
    A freshly generated key pair.
*/
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub private: PrivateKey,
    pub public: PublicKey,
}

impl KeyPair {
    pub fn generate(curve: Curve) -> EckaResult<Self> {
        let private = PrivateKey::generate(curve)?;
        let public = private.public_key();
        Ok(Self { private, public })
    }
}

/**
    Random bytes from the OS generator, for challenges and derivation
    randoms.
*/
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut out = [0u8; N];
    OsRng.fill_bytes(&mut out);
    out
}

/**
    X9.62 uncompressed encoding: `04 ‖ X ‖ Y`, coordinates left-padded to the
    field size.
*/
pub fn encode_point(key: &PublicKey) -> Vec<u8> {
    match key {
        PublicKey::P256(k) => k.to_encoded_point(false).as_bytes().to_vec(),
        PublicKey::P384(k) => k.to_encoded_point(false).as_bytes().to_vec(),
        PublicKey::P521(k) => k.to_encoded_point(false).as_bytes().to_vec(),
    }
}

/**
    Decode an uncompressed point on `curve`. The length must be exactly the
    curve's point length and the point must lie on the curve.
*/
pub fn decode_point(bytes: &[u8], curve: Curve) -> EckaResult<PublicKey> {
    if !curve.is_supported() {
        return Err(EckaError::UnsupportedCurve(curve));
    }
    if bytes.len() != curve.point_len() {
        return Err(EckaError::InvalidPoint(format!(
            "expected {} bytes for {curve}, got {}",
            curve.point_len(),
            bytes.len()
        )));
    }
    if bytes[0] != 0x04 {
        return Err(EckaError::InvalidPoint(format!(
            "expected uncompressed point, got prefix 0x{:02X}",
            bytes[0]
        )));
    }

    let not_on_curve = |_| EckaError::InvalidPoint(format!("point is not on {curve}"));
    match curve {
        Curve::P256 => p256::PublicKey::from_sec1_bytes(bytes)
            .map(PublicKey::P256)
            .map_err(not_on_curve),
        Curve::P384 => p384::PublicKey::from_sec1_bytes(bytes)
            .map(PublicKey::P384)
            .map_err(not_on_curve),
        Curve::P521 => p521::PublicKey::from_sec1_bytes(bytes)
            .map(PublicKey::P521)
            .map_err(not_on_curve),
        other => Err(EckaError::UnsupportedCurve(other)),
    }
}

/**
    Decode a big-endian private scalar of exactly `coordinate_len` bytes.
    Zero and values at or above the group order are rejected.
*/
pub fn decode_private_scalar(bytes: &[u8], curve: Curve) -> EckaResult<PrivateKey> {
    if !curve.is_supported() {
        return Err(EckaError::UnsupportedCurve(curve));
    }
    if bytes.len() != curve.coordinate_len() {
        return Err(EckaError::InvalidScalar(format!(
            "expected {} bytes for {curve}, got {}",
            curve.coordinate_len(),
            bytes.len()
        )));
    }

    let out_of_range = |_| EckaError::InvalidScalar("scalar is zero or not below the order".into());
    match curve {
        Curve::P256 => p256::SecretKey::from_slice(bytes)
            .map(PrivateKey::P256)
            .map_err(out_of_range),
        Curve::P384 => p384::SecretKey::from_slice(bytes)
            .map(PrivateKey::P384)
            .map_err(out_of_range),
        Curve::P521 => p521::SecretKey::from_slice(bytes)
            .map(PrivateKey::P521)
            .map_err(out_of_range),
        other => Err(EckaError::UnsupportedCurve(other)),
    }
}

/**
    `B0 len point ‖ F0 key_param_ref`, the contents of a `7F49` template.
*/
pub fn encode_key_with_param_ref(key: &PublicKey, key_param_ref: u8) -> EckaResult<Vec<u8>> {
    Ok(EncodedPublicKey {
        point: encode_point(key),
        key_param_ref,
    }
    .to_bytes()?)
}

/**
    Encode `key` with the reference the registry assigns to its curve.
*/
pub fn encoded_public_key(key: &PublicKey, registry: &CurveRegistry) -> EckaResult<EncodedPublicKey> {
    Ok(EncodedPublicKey {
        point: encode_point(key),
        key_param_ref: registry.reference_for(key)?,
    })
}

/**
    Resolve the reference through the registry and decode the point.
*/
pub fn decode_public_key(
    encoded: &EncodedPublicKey,
    registry: &CurveRegistry,
) -> EckaResult<PublicKey> {
    let curve = registry.lookup(encoded.key_param_ref)?;
    decode_point(&encoded.point, curve)
}
