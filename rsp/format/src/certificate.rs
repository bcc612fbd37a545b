/*!
    GlobalPlatform / SGP.02 certificate format.

    Structure (all BER-TLV, tags 5Fxx and 7Fxx are two bytes):
    - `7F21` certificate
      - `93`   certificate serial number
      - `42`   CA key identifier
      - `5F20` subject key identifier
      - `95`   key usage (2 bytes)
      - `5F25` effective date (optional, BCD)
      - `5F24` expiration date (BCD)
      - `45`   ECASD image number (ECASD certificates only)
      - `73`   discretionary data (`53` in older certificates)
      - `7F49` public key: `B0` uncompressed point + `F0` key parameter reference
      - `5F38` public key modulus (optional)
      - `5F37` signature (`9E` in older certificates)

    The signature covers every element before it, in the order received. The
    decoder keeps those bytes so verification does not depend on re-encoding.
*/

use rsp_core::tags;
use rsp_core::{Cursor, Tag, TagWidth, Tlvs, append_tlv, decode_tlv, decode_tlv_expect};

use crate::date::CertDate;
use crate::error::{FormatError, FormatResult};
use crate::types::{CertificateType, KeyUsage};

/**
    Public key template contents: an uncompressed EC point and the key
    parameter reference naming its curve.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedPublicKey {
    pub point: Vec<u8>,
    pub key_param_ref: u8,
}

impl EncodedPublicKey {
    /**
        `B0 len point` followed by the two-byte trailer `F0 ref`.
    */
    pub fn to_bytes(&self) -> FormatResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.point.len() + 6);
        append_tlv(&mut out, tags::EC_PUBLIC_POINT, &self.point)?;
        out.push(0xF0);
        out.push(self.key_param_ref);
        Ok(out)
    }

    /**
        Parse the value of a `7F49` element. Accepts the two-byte `F0 ref`
        trailer as well as a full `F0 01 ref` TLV.
    */
    pub fn from_bytes(value: &[u8]) -> FormatResult<Self> {
        let (point, rest) = decode_tlv_expect(Cursor::new(value), tags::EC_PUBLIC_POINT)?;
        let key_param_ref = match rest.remaining() {
            [0xF0, r] => *r,
            [0xF0, 0x01, r] => *r,
            [] => return Err(FormatError::MissingField("key parameter reference")),
            other => {
                return Err(FormatError::InvalidPublicKey(format!(
                    "unexpected trailer {}",
                    hex::encode_upper(other)
                )));
            }
        };
        Ok(Self {
            point: point.to_vec(),
            key_param_ref,
        })
    }
}

/**
    Discretionary data with the tag it arrived under (73 or 53).
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscretionaryData {
    pub tag: Tag,
    pub data: Vec<u8>,
}

impl DiscretionaryData {
    pub fn certificate_type(&self) -> Option<CertificateType> {
        match self.find(tags::CERTIFICATE_TYPE)? {
            [t] => CertificateType::from_u8(*t),
            _ => None,
        }
    }

    pub fn ca_key_id(&self) -> Option<&[u8]> {
        self.find(tags::DISCRETIONARY_CA_KEY_ID)
    }

    fn find(&self, tag: Tag) -> Option<&[u8]> {
        Tlvs::new(&self.data, TagWidth::Auto).find(tag).ok().flatten()
    }
}

/**
    A decoded certificate.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    pub serial: Vec<u8>,
    pub ca_key_id: Vec<u8>,
    pub subject_key_id: Vec<u8>,
    pub key_usage: KeyUsage,
    pub effective_date: Option<CertDate>,
    pub expiration_date: CertDate,
    pub ecasd_image_number: Option<Vec<u8>>,
    pub discretionary: Option<DiscretionaryData>,
    pub public_key: EncodedPublicKey,
    pub public_key_modulus: Option<Vec<u8>>,
    pub signature: Vec<u8>,
    signed: Vec<u8>,
}

impl CertificateRecord {
    pub fn from_hex(s: &str) -> FormatResult<Self> {
        let bytes = rsp_core::utils::decode_hex(s)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(data: &[u8]) -> FormatResult<Self> {
        let (body, rest) = decode_tlv_expect(Cursor::new(data), tags::CERTIFICATE)?;
        if !rest.is_empty() {
            return Err(FormatError::TrailingData(rest.remaining_len()));
        }

        let mut serial = None;
        let mut ca_key_id = None;
        let mut subject_key_id = None;
        let mut key_usage = None;
        let mut effective_date = None;
        let mut expiration_date = None;
        let mut ecasd_image_number = None;
        let mut discretionary = None;
        let mut public_key = None;
        let mut public_key_modulus = None;
        let mut signature = None;
        let mut signed = Vec::with_capacity(body.len());

        let mut cursor = Cursor::new(body);
        while !cursor.is_empty() {
            let start = cursor.position();
            let (tlv, next) = decode_tlv(cursor, TagWidth::Auto)?;
            let raw = &body[start..next.position()];
            cursor = next;

            match tlv.tag {
                t if t == tags::SIGNATURE || t == tags::SIGNATURE_ALT => {
                    signature = Some(tlv.value.to_vec());
                    continue;
                }
                t if t == tags::SERIAL_NUMBER => serial = Some(tlv.value.to_vec()),
                t if t == tags::CA_KEY_ID => ca_key_id = Some(tlv.value.to_vec()),
                t if t == tags::SUBJECT_KEY_ID => subject_key_id = Some(tlv.value.to_vec()),
                t if t == tags::KEY_USAGE => {
                    let bytes: [u8; 2] = tlv
                        .value
                        .try_into()
                        .map_err(|_| FormatError::InvalidKeyUsage(tlv.value.len()))?;
                    key_usage = Some(KeyUsage(u16::from_be_bytes(bytes)));
                }
                t if t == tags::EFFECTIVE_DATE => {
                    effective_date = Some(CertDate::from_bcd(tlv.value)?);
                }
                t if t == tags::EXPIRATION_DATE => {
                    expiration_date = Some(CertDate::from_bcd(tlv.value)?);
                }
                t if t == tags::ECASD_IMAGE_NUMBER => {
                    ecasd_image_number = Some(tlv.value.to_vec());
                }
                t if t == tags::DISCRETIONARY_DATA || t == tags::DISCRETIONARY_DATA_PRIMITIVE => {
                    discretionary = Some(DiscretionaryData {
                        tag: t,
                        data: tlv.value.to_vec(),
                    });
                }
                t if t == tags::PUBLIC_KEY => {
                    public_key = Some(EncodedPublicKey::from_bytes(tlv.value)?);
                }
                t if t == tags::PUBLIC_KEY_MODULUS => {
                    public_key_modulus = Some(tlv.value.to_vec());
                }
                _ => {}
            }
            signed.extend_from_slice(raw);
        }

        Ok(Self {
            serial: serial.ok_or(FormatError::MissingField("serial number"))?,
            ca_key_id: ca_key_id.ok_or(FormatError::MissingField("CA key identifier"))?,
            subject_key_id: subject_key_id
                .ok_or(FormatError::MissingField("subject key identifier"))?,
            key_usage: key_usage.ok_or(FormatError::MissingField("key usage"))?,
            effective_date,
            expiration_date: expiration_date
                .ok_or(FormatError::MissingField("expiration date"))?,
            ecasd_image_number,
            discretionary,
            public_key: public_key.ok_or(FormatError::MissingField("public key"))?,
            public_key_modulus,
            signature: signature.ok_or(FormatError::MissingField("signature"))?,
            signed,
        })
    }

    /**
        The bytes covered by the signature: every element except the
        signature, exactly as they appeared in the certificate.
    */
    pub fn signed_bytes(&self) -> &[u8] {
        &self.signed
    }

    pub fn certificate_type(&self) -> Option<CertificateType> {
        self.discretionary.as_ref()?.certificate_type()
    }

    pub fn to_bytes(&self) -> FormatResult<Vec<u8>> {
        assemble_certificate(&self.signed, &self.signature)
    }
}

/**
    Wrap signing data and its signature into a `7F21` certificate.
*/
pub fn assemble_certificate(signing_data: &[u8], signature: &[u8]) -> FormatResult<Vec<u8>> {
    let mut body = Vec::with_capacity(signing_data.len() + signature.len() + 4);
    body.extend_from_slice(signing_data);
    append_tlv(&mut body, tags::SIGNATURE, signature)?;

    let mut out = Vec::with_capacity(body.len() + 5);
    append_tlv(&mut out, tags::CERTIFICATE, &body)?;
    Ok(out)
}
