/*!
    Certificate signing data and signatures.

    Signing data is the body of a `7F21` certificate without its `5F37`
    signature, in this order:

      7F49 { B0 point ‖ F0 ref }
      93   serial number (unsigned big-endian)
      42   CA key identifier (authority key identifier)
      5F20 subject key identifier
      95   key usage
      5F25 effective date (only when the source has one)
      5F24 expiration date
      73   { C8 01 type ‖ C9 len ca-key-id ‖ extra }

    The card rebuilds the same bytes to check the signature, so the order
    and every length must match exactly.
*/

use chrono::NaiveDate;

use rsp_core::tags;
use rsp_core::{append_tlv, utils::unsigned_be};
use rsp_format::{
    Apdu, CertDate, CertificateRecord, CertificateType, KeyUsage, assemble_certificate,
    send_off_card_certificate,
};

use crate::crypto::{SignatureEncoding, sign, verify};
use crate::curves::CurveRegistry;
use crate::error::EckaResult;
use crate::keys::{PrivateKey, PublicKey, decode_public_key, encode_key_with_param_ref};

/**
    The certificate attributes the signing data is built from.
*/
pub trait CertificateSource {
    /// Unsigned big-endian serial number.
    fn serial_number(&self) -> Vec<u8>;
    fn not_before(&self) -> Option<NaiveDate>;
    fn not_after(&self) -> NaiveDate;
    fn subject_key_id(&self) -> &[u8];
    fn authority_key_id(&self) -> &[u8];
    fn public_key(&self, registry: &CurveRegistry) -> EckaResult<PublicKey>;
}

/**
    Certificate attributes supplied directly, typically pulled out of an
    X.509 certificate by the caller.
*/
#[derive(Debug, Clone)]
pub struct CertificateInfo {
    pub serial_number: Vec<u8>,
    pub not_before: Option<NaiveDate>,
    pub not_after: NaiveDate,
    pub subject_key_id: Vec<u8>,
    pub authority_key_id: Vec<u8>,
    pub public_key: PublicKey,
}

impl CertificateSource for CertificateInfo {
    fn serial_number(&self) -> Vec<u8> {
        unsigned_be(&self.serial_number).to_vec()
    }

    fn not_before(&self) -> Option<NaiveDate> {
        self.not_before
    }

    fn not_after(&self) -> NaiveDate {
        self.not_after
    }

    fn subject_key_id(&self) -> &[u8] {
        &self.subject_key_id
    }

    fn authority_key_id(&self) -> &[u8] {
        &self.authority_key_id
    }

    fn public_key(&self, _registry: &CurveRegistry) -> EckaResult<PublicKey> {
        Ok(self.public_key.clone())
    }
}

impl CertificateSource for CertificateRecord {
    fn serial_number(&self) -> Vec<u8> {
        unsigned_be(&self.serial).to_vec()
    }

    fn not_before(&self) -> Option<NaiveDate> {
        self.effective_date.as_ref().map(CertDate::date)
    }

    fn not_after(&self) -> NaiveDate {
        self.expiration_date.date()
    }

    fn subject_key_id(&self) -> &[u8] {
        &self.subject_key_id
    }

    fn authority_key_id(&self) -> &[u8] {
        &self.ca_key_id
    }

    fn public_key(&self, registry: &CurveRegistry) -> EckaResult<PublicKey> {
        decode_public_key(&self.public_key, registry)
    }
}

/**
    Build the to-be-signed certificate body for `source`.

    `extra_tlvs` is appended verbatim inside the discretionary data after
    the certificate type and CA key identifier.
*/
pub fn make_signing_data(
    source: &impl CertificateSource,
    registry: &CurveRegistry,
    certificate_type: CertificateType,
    extra_tlvs: &[u8],
    key_usage: KeyUsage,
) -> EckaResult<Vec<u8>> {
    let public_key = source.public_key(registry)?;
    let key_param_ref = registry.reference_for(&public_key)?;
    let key_template = encode_key_with_param_ref(&public_key, key_param_ref)?;

    let mut out = Vec::with_capacity(key_template.len() + 128);
    append_tlv(&mut out, tags::PUBLIC_KEY, &key_template)?;
    append_tlv(&mut out, tags::SERIAL_NUMBER, &source.serial_number())?;
    append_tlv(&mut out, tags::CA_KEY_ID, source.authority_key_id())?;
    append_tlv(&mut out, tags::SUBJECT_KEY_ID, source.subject_key_id())?;
    append_tlv(&mut out, tags::KEY_USAGE, &key_usage.to_bytes())?;
    if let Some(not_before) = source.not_before() {
        let date = CertDate::from_date(not_before)?;
        append_tlv(&mut out, tags::EFFECTIVE_DATE, date.as_bytes())?;
    }
    let expiry = CertDate::from_date(source.not_after())?;
    append_tlv(&mut out, tags::EXPIRATION_DATE, expiry.as_bytes())?;

    let mut discretionary = certificate_type.default_discretionary_data().to_vec();
    append_tlv(
        &mut discretionary,
        tags::DISCRETIONARY_CA_KEY_ID,
        source.authority_key_id(),
    )?;
    discretionary.extend_from_slice(extra_tlvs);
    append_tlv(&mut out, tags::DISCRETIONARY_DATA, &discretionary)?;

    Ok(out)
}

/**
    Sign `signing_data` and wrap it into a complete `7F21` certificate.
*/
pub fn sign_certificate(
    signing_data: &[u8],
    issuer_key: &PrivateKey,
    encoding: SignatureEncoding,
) -> EckaResult<Vec<u8>> {
    let signature = sign(issuer_key, signing_data, encoding)?;
    Ok(assemble_certificate(signing_data, &signature)?)
}

/**
    Check a decoded certificate's signature against the issuer key.
*/
pub fn verify_certificate(record: &CertificateRecord, issuer_key: &PublicKey) -> EckaResult<()> {
    verify(issuer_key, &record.signature, record.signed_bytes())
}

/**
    STORE DATA for a certificate whose signature was produced elsewhere,
    for example an X.509 certificate re-expressed in card format.
*/
pub fn send_certificate_with_signature(
    source: &impl CertificateSource,
    registry: &CurveRegistry,
    certificate_type: CertificateType,
    key_usage: KeyUsage,
    signature: &[u8],
) -> EckaResult<Apdu> {
    let signing_data = make_signing_data(source, registry, certificate_type, &[], key_usage)?;
    let certificate = assemble_certificate(&signing_data, signature)?;
    Ok(send_off_card_certificate(&certificate)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::Curve;
    use crate::error::EckaError;
    use crate::keys::KeyPair;
    use hex_literal::hex;

    fn info(public_key: PublicKey) -> CertificateInfo {
        CertificateInfo {
            serial_number: hex!("00 01 23").to_vec(),
            not_before: NaiveDate::from_ymd_opt(2024, 1, 1),
            not_after: NaiveDate::from_ymd_opt(2034, 12, 31).unwrap(),
            subject_key_id: hex!("0102030405").to_vec(),
            authority_key_id: hex!("A1A2A3").to_vec(),
            public_key,
        }
    }

    #[test]
    fn signing_data_layout() {
        let public = crate::keys::decode_point(Curve::P256.params().g, Curve::P256).unwrap();
        let registry = CurveRegistry::standard();
        let data = make_signing_data(
            &info(public),
            &registry,
            CertificateType::SmDp,
            &hex!("C1 01 FF"),
            KeyUsage::KEY_AGREEMENT,
        )
        .unwrap();

        assert_eq!(data[..5], hex!("7F49 45 B0 41"));
        assert_eq!(data[70..72], hex!("F0 00"));
        assert_eq!(
            data[72..],
            hex!(
                "93 02 0123"
                "42 03 A1A2A3"
                "5F20 05 0102030405"
                "95 02 0080"
                "5F25 04 20240101"
                "5F24 04 20341231"
                "73 0B C80101 C903A1A2A3 C101FF"
            )
        );
    }

    #[test]
    fn no_effective_date() {
        let pair = KeyPair::generate(Curve::P384).unwrap();
        let mut source = info(pair.public);
        source.not_before = None;
        let data = make_signing_data(
            &source,
            &CurveRegistry::standard(),
            CertificateType::SmSr,
            &[],
            KeyUsage::KEY_AGREEMENT,
        )
        .unwrap();
        let tail = hex!("95 02 0080 5F24 04 20341231 73 08 C80102 C903A1A2A3");
        assert!(data.ends_with(&tail));
    }

    #[test]
    fn sign_then_verify_and_reproduce() {
        let issuer = KeyPair::generate(Curve::P256).unwrap();
        let subject = KeyPair::generate(Curve::P256).unwrap();
        let registry = CurveRegistry::standard();
        let data = make_signing_data(
            &info(subject.public.clone()),
            &registry,
            CertificateType::SmDp,
            &[],
            KeyUsage::KEY_AGREEMENT,
        )
        .unwrap();
        let cert = sign_certificate(&data, &issuer.private, SignatureEncoding::Der).unwrap();

        let record = CertificateRecord::from_bytes(&cert).unwrap();
        verify_certificate(&record, &issuer.public).unwrap();
        assert_eq!(record.signed_bytes(), data);
        assert_eq!(record.public_key(&registry).unwrap(), subject.public);
        assert_eq!(record.certificate_type(), Some(CertificateType::SmDp));

        let rebuilt = make_signing_data(
            &record,
            &registry,
            CertificateType::SmDp,
            &[],
            KeyUsage::KEY_AGREEMENT,
        )
        .unwrap();
        assert_eq!(rebuilt, data);

        assert_eq!(
            verify_certificate(&record, &subject.public),
            Err(EckaError::SignatureInvalid)
        );
    }

    #[test]
    fn certificate_with_external_signature() {
        let pair = KeyPair::generate(Curve::P256).unwrap();
        let apdu = send_certificate_with_signature(
            &info(pair.public),
            &CurveRegistry::standard(),
            CertificateType::SmDp,
            KeyUsage::KEY_AGREEMENT,
            &hex!("3006020101020101"),
        )
        .unwrap();
        assert_eq!((apdu.cla, apdu.ins, apdu.p1, apdu.p2), (0x80, 0xE2, 0x09, 0x00));
        assert_eq!(apdu.data[..2], hex!("3A01"));
        assert!(apdu.data.ends_with(&hex!("5F37 08 3006020101020101")));
    }
}
