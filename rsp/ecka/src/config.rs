use serde::Deserialize;

use rsp_core::utils::decode_hex;

use crate::crypto::SignatureEncoding;
use crate::curves::{Curve, CurveRegistry};
use crate::error::{EckaError, EckaResult};
use crate::keys::decode_point;
use crate::trust::TrustAnchor;

/// Key data length used when nothing else is configured.
pub const DEFAULT_KEY_DATA_BITS: usize = 256;

/**
    Immutable settings shared by every key establishment session.
*/
#[derive(Debug, Clone)]
pub struct Config {
    pub registry: CurveRegistry,
    pub trust: TrustAnchor,
    pub signature_encoding: SignatureEncoding,
    pub key_data_bits: usize,
}

impl Config {
    pub fn new(trust: TrustAnchor) -> Self {
        Self {
            registry: CurveRegistry::standard(),
            trust,
            signature_encoding: SignatureEncoding::default(),
            key_data_bits: DEFAULT_KEY_DATA_BITS,
        }
    }

    pub fn from_json(json: &str) -> EckaResult<Self> {
        let file: ConfigFile =
            serde_json::from_str(json).map_err(|e| EckaError::InvalidConfig(e.to_string()))?;
        file.try_into()
    }
}

/**
    On-disk configuration. Byte strings are hex, whitespace allowed.
*/
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Uncompressed CI public key point
    pub ci_public_key: String,
    /// Key parameter reference of the CI key's curve (defaults to P-256)
    #[serde(default)]
    pub ci_key_param_ref: u8,
    /// CA key identifier certificates must carry
    #[serde(default)]
    pub ci_key_id: Option<String>,
    /// Serial numbers to reject
    #[serde(default)]
    pub revoked_serials: Vec<String>,
    #[serde(default)]
    pub signature_encoding: SignatureEncoding,
    /// Curve names to accept; all known curves when empty
    #[serde(default)]
    pub curves: Vec<String>,
    #[serde(default)]
    pub key_data_bits: Option<usize>,
}

impl TryFrom<ConfigFile> for Config {
    type Error = EckaError;

    fn try_from(file: ConfigFile) -> EckaResult<Self> {
        let invalid = |what: &str, e: &dyn std::fmt::Display| {
            EckaError::InvalidConfig(format!("{what}: {e}"))
        };

        let registry = if file.curves.is_empty() {
            CurveRegistry::standard()
        } else {
            let curves = file
                .curves
                .iter()
                .map(|name| name.parse::<Curve>().map_err(|e| invalid("curves", &e)))
                .collect::<EckaResult<Vec<_>>>()?;
            CurveRegistry::new(curves)?
        };

        let ci_curve = registry
            .lookup(file.ci_key_param_ref)
            .map_err(|e| invalid("ci_key_param_ref", &e))?;
        let point = decode_hex(&file.ci_public_key).map_err(|e| invalid("ci_public_key", &e))?;
        let ci_public_key =
            decode_point(&point, ci_curve).map_err(|e| invalid("ci_public_key", &e))?;

        let mut trust = TrustAnchor::new(ci_public_key);
        if let Some(key_id) = &file.ci_key_id {
            trust = trust.with_ci_key_id(decode_hex(key_id).map_err(|e| invalid("ci_key_id", &e))?);
        }
        for serial in &file.revoked_serials {
            trust.revoke(&decode_hex(serial).map_err(|e| invalid("revoked_serials", &e))?);
        }

        let key_data_bits = file.key_data_bits.unwrap_or(DEFAULT_KEY_DATA_BITS);
        if key_data_bits == 0 || key_data_bits % 8 != 0 {
            return Err(EckaError::InvalidConfig(format!(
                "key_data_bits: {key_data_bits} is not a positive multiple of 8"
            )));
        }

        Ok(Self {
            registry,
            trust,
            signature_encoding: file.signature_encoding,
            key_data_bits,
        })
    }
}
