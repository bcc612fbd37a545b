#![allow(clippy::doc_overindented_list_items)]

mod cert;
mod config;
mod curves;
mod error;
mod establish;
mod keys;
mod session;
mod trust;

pub mod crypto;

pub mod format {
    pub use rsp_format::*;
}

pub use self::cert::{
    CertificateInfo, CertificateSource, make_signing_data, send_certificate_with_signature,
    sign_certificate, verify_certificate,
};
pub use self::config::{Config, ConfigFile, DEFAULT_KEY_DATA_BITS};
pub use self::curves::{Curve, CurveParams, CurveRegistry};
pub use self::error::{EckaError, EckaResult, TrustFailure};
pub use self::establish::{
    KeyMaterial, ReceiptParams, SessionKeys, compute_key_data, compute_receipt,
    compute_shared_info, make_crt, send_key_parameters, shared_info_for, verify_key_parameters,
    verify_receipt,
};
pub use self::keys::{
    KeyPair, PrivateKey, PublicKey, decode_point, decode_private_scalar, decode_public_key,
    encode_key_with_param_ref, encode_point, encoded_public_key, random_bytes,
};
pub use self::session::{Session, SessionStage};
pub use self::trust::{TrustAnchor, TrustedCertificate};
