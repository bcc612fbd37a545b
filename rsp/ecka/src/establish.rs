/*!
    Key-set establishment steps (GlobalPlatform Amendment E scenario #3,
    as profiled by SGP.02).

    Off-card entity                               Card (ECASD)
    ---------------                               ------------
    INSTALL [for personalization]            →
    STORE DATA 3A01 (certificate)            →    verify against CI
    STORE DATA 3A02 ‖ 7F49 ‖ 5F37            →    verify, ECDH, KDF
                                             ←    85 DR? ‖ 86 receipt
    ECDH, KDF, verify receipt

    Each function here is stateless. `Session` sequences them.
*/

use tracing::warn;
use zeroize::Zeroizing;

use rsp_core::tags;
use rsp_core::{append_tlv, utils::pad80};
use rsp_format::{
    Apdu, ControlReferenceTemplate, EncodedPublicKey, HostIdentification, KeyParameters,
    KeyQualifier, ScenarioFlags, SharedInfo, store_key_parameters,
};

use crate::crypto::{
    AES_BLOCK_LEN, SignatureEncoding, aes_cmac, aes_cmac_verify, derive_shared_secret, sign,
    verify, x963_kdf,
};
use crate::curves::CurveRegistry;
use crate::error::{EckaError, EckaResult};
use crate::keys::{KeyPair, PrivateKey, PublicKey, decode_public_key, encode_point};

/**
    CRT for scenario #3. One key selects the single-key qualifier, any
    other count the three-key qualifier. SDIN and host identifier are
    only included when both are given.

    Key type, length, key access and initial counter keep their defaults
    (AES-128, absent, `91 00`). Chain `with_key`, `with_key_access` and
    `with_initial_counter` on the result to change them.
*/
pub fn make_crt(
    key_count: usize,
    sdin: Option<&[u8]>,
    host_id: Option<&[u8]>,
    key_id: u8,
    key_version: u8,
    scenario: ScenarioFlags,
) -> ControlReferenceTemplate {
    let mut crt = ControlReferenceTemplate::new(key_id, key_version);
    crt.qualifier = if key_count == 1 {
        KeyQualifier::SingleKey
    } else {
        KeyQualifier::ThreeKeys
    };
    crt.scenario = scenario.without(ScenarioFlags::SDIN_INCLUDED);
    if let (Some(sdin), Some(host_id)) = (sdin, host_id) {
        crt.host = Some(HostIdentification {
            sdin: sdin.to_vec(),
            host_id: host_id.to_vec(),
        });
    }
    crt
}

/**
    STORE DATA with the signed ephemeral key parameters. The signature
    covers `3A02 crt ‖ 7F49 key ‖ 0085 challenge` and is made with the
    ephemeral private key.
*/
pub fn send_key_parameters(
    challenge: &[u8],
    ephemeral: &KeyPair,
    crt: &[u8],
    key_param_ref: u8,
    encoding: SignatureEncoding,
) -> EckaResult<Apdu> {
    let public_key = EncodedPublicKey {
        point: encode_point(&ephemeral.public),
        key_param_ref,
    };
    let signed = KeyParameters::signed_data(crt, &public_key, challenge)?;
    let signature = sign(&ephemeral.private, &signed, encoding)?;
    Ok(store_key_parameters(&KeyParameters {
        crt: crt.to_vec(),
        public_key,
        signature,
    })?)
}

/**
    Card side of `send_key_parameters`: decode the ephemeral key and check
    its signature against the challenge the card issued.
*/
pub fn verify_key_parameters(
    params: &KeyParameters,
    challenge: &[u8],
    registry: &CurveRegistry,
) -> EckaResult<PublicKey> {
    let public_key = decode_public_key(&params.public_key, registry)?;
    let signed = KeyParameters::signed_data(&params.crt, &params.public_key, challenge)?;
    verify(&public_key, &params.signature, &signed)?;
    Ok(public_key)
}

/**
    KDF shared info for an AES-128 key set.
*/
pub fn compute_shared_info(
    qualifier: KeyQualifier,
    derivation_random: Option<&[u8]>,
    host_id: Option<&[u8]>,
    sdin: Option<&[u8]>,
    sin: Option<&[u8]>,
) -> EckaResult<Vec<u8>> {
    let info = SharedInfo {
        derivation_random,
        host_id,
        sin,
        sdin,
        ..SharedInfo::new(qualifier)
    };
    Ok(info.to_bytes()?)
}

/**
    Derived key data: the receipt key followed by the session keys.
*/
pub struct KeyMaterial(Zeroizing<Vec<u8>>);

impl KeyMaterial {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /**
        Cut into the receipt key and `key_count` keys of `key_length`
        bytes. Fails when the material is too short.
    */
    pub fn split(&self, key_length: usize, key_count: usize) -> EckaResult<SessionKeys> {
        let needed = key_length * (key_count + 1);
        if key_length == 0 || self.0.len() < needed {
            return Err(EckaError::InvalidKeyDataLength(self.0.len() * 8));
        }
        let (receipt_key, keys) = self.0[..needed].split_at(key_length);
        Ok(SessionKeys {
            receipt_key: Zeroizing::new(receipt_key.to_vec()),
            keys: keys
                .chunks_exact(key_length)
                .map(|k| Zeroizing::new(k.to_vec()))
                .collect(),
        })
    }
}

impl core::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "KeyMaterial({} bytes)", self.0.len())
    }
}

/**
    Keys produced by a completed establishment.
*/
pub struct SessionKeys {
    receipt_key: Zeroizing<Vec<u8>>,
    keys: Vec<Zeroizing<Vec<u8>>>,
}

impl SessionKeys {
    pub fn receipt_key(&self) -> &[u8] {
        &self.receipt_key
    }

    /// Session keys in CRT order (S-ENC, S-MAC, DEK for three keys).
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.keys.iter().map(|k| k.as_slice())
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

impl core::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SessionKeys({} keys)", self.keys.len())
    }
}

/**
    ECDH between `private` and `public`, then the X9.63 KDF over
    `shared_info`, producing `bits` of key data.
*/
pub fn compute_key_data(
    private: &PrivateKey,
    public: &PublicKey,
    shared_info: &[u8],
    bits: usize,
) -> EckaResult<KeyMaterial> {
    let zab = derive_shared_secret(private, public)?;
    Ok(KeyMaterial(x963_kdf(&zab, Some(shared_info), bits)?))
}

/**
    Inputs to the key establishment receipt.
*/
#[derive(Debug, Clone, Copy)]
pub struct ReceiptParams<'a> {
    pub derivation_random: Option<&'a [u8]>,
    pub sdin: Option<&'a [u8]>,
    pub host_id: Option<&'a [u8]>,
    pub key_id: u8,
    pub key_version: u8,
    pub scenario: ScenarioFlags,
}

impl<'a> ReceiptParams<'a> {
    pub const fn new(key_id: u8, key_version: u8, scenario: ScenarioFlags) -> Self {
        Self {
            derivation_random: None,
            sdin: None,
            host_id: None,
            key_id,
            key_version,
            scenario,
        }
    }

    /**
        Single-key CRT ‖ `85 dr`, padded with `80 00..` to a block boundary
        when not already aligned.
    */
    pub fn mac_input(&self) -> EckaResult<Vec<u8>> {
        let crt = make_crt(
            1,
            self.sdin,
            self.host_id,
            self.key_id,
            self.key_version,
            self.scenario,
        );
        let mut data = crt.to_bytes()?;
        if let Some(dr) = self.derivation_random {
            append_tlv(&mut data, tags::DERIVATION_RANDOM, dr)?;
        }
        if data.len() % AES_BLOCK_LEN != 0 {
            data = pad80(&data, AES_BLOCK_LEN);
        }
        Ok(data)
    }
}

pub fn compute_receipt(
    params: &ReceiptParams<'_>,
    receipt_key: &[u8],
) -> EckaResult<[u8; AES_BLOCK_LEN]> {
    aes_cmac(receipt_key, &params.mac_input()?)
}

/**
    Recompute the receipt and compare in constant time.
*/
pub fn verify_receipt(
    params: &ReceiptParams<'_>,
    receipt_key: &[u8],
    receipt: &[u8],
) -> EckaResult<()> {
    if aes_cmac_verify(receipt_key, &params.mac_input()?, receipt)? {
        Ok(())
    } else {
        warn!(key_id = params.key_id, key_version = params.key_version, "receipt mismatch");
        Err(EckaError::ReceiptMismatch)
    }
}

/// Shared info matching a CRT: its qualifier, key type and length, and host.
pub fn shared_info_for(
    crt: &ControlReferenceTemplate,
    derivation_random: Option<&[u8]>,
    sin: Option<&[u8]>,
) -> EckaResult<Vec<u8>> {
    let host = crt.host.as_ref();
    let info = SharedInfo {
        key_type: crt.key_type,
        key_length: crt.key_length,
        derivation_random,
        host_id: host.map(|h| h.host_id.as_slice()),
        sin: host.and(sin),
        sdin: host.map(|h| h.sdin.as_slice()),
        ..SharedInfo::new(crt.qualifier)
    };
    Ok(info.to_bytes()?)
}
