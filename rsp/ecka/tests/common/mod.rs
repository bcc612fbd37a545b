#![allow(dead_code)]

use chrono::NaiveDate;

use rsp_core::tags;
use rsp_core::{Cursor, decode_tlv_expect, utils::decode_hex};
use rsp_ecka::format::{
    Apdu, CertificateRecord, KeyEstablishmentResponse, KeyParameters, ResponseApdu,
    SW_SUCCESS, ScenarioFlags,
};
use rsp_ecka::{
    Config, Curve, PrivateKey, ReceiptParams, SessionKeys, TrustAnchor, TrustedCertificate,
    compute_key_data, compute_receipt, decode_point, decode_private_scalar, random_bytes,
    shared_info_for, verify_key_parameters,
};

pub const CI_PUBLIC_KEY: &str = include_str!("../../testfiles/ci_public_key.hex");
pub const CI_KEY_ID: &str = include_str!("../../testfiles/ci_key_id.hex");
pub const SMDP_CERTIFICATE: &str = include_str!("../../testfiles/smdp_certificate.hex");
pub const ECASD_CERTIFICATE: &str = include_str!("../../testfiles/ecasd_certificate.hex");
pub const ECASD_PRIVATE_KEY: &str = include_str!("../../testfiles/ecasd_private_key.hex");

pub const SW_WRONG_DATA: u16 = 0x6A80;
pub const SW_CONDITIONS_NOT_SATISFIED: u16 = 0x6985;
pub const SW_INS_NOT_SUPPORTED: u16 = 0x6D00;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

pub fn hex(s: &str) -> Vec<u8> {
    decode_hex(s).unwrap()
}

pub fn ci_config() -> Config {
    let ci = decode_point(&hex(CI_PUBLIC_KEY), Curve::P256).unwrap();
    Config::new(TrustAnchor::new(ci).with_ci_key_id(hex(CI_KEY_ID)))
}

/**
    An ECASD that answers key establishment commands the way a card does.
*/
pub struct CardSimulator {
    config: Config,
    ecasd_key: PrivateKey,
    certificate: CertificateRecord,
    installed: bool,
    off_card: Option<TrustedCertificate>,
    challenge: Option<[u8; 16]>,
    keys: Option<SessionKeys>,
    /// Flip a bit of the receipt before answering.
    pub corrupt_receipt: bool,
}

impl CardSimulator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ecasd_key: decode_private_scalar(&hex(ECASD_PRIVATE_KEY), Curve::P256).unwrap(),
            certificate: CertificateRecord::from_hex(ECASD_CERTIFICATE).unwrap(),
            installed: false,
            off_card: None,
            challenge: None,
            keys: None,
            corrupt_receipt: false,
        }
    }

    pub fn ecasd_certificate(&self) -> Vec<u8> {
        self.certificate.to_bytes().unwrap()
    }

    pub fn keys(&self) -> Option<&SessionKeys> {
        self.keys.as_ref()
    }

    pub fn transmit(&mut self, apdu: &Apdu) -> ResponseApdu {
        let result = match (apdu.ins, apdu.p1) {
            (0xE6, 0x20) => {
                self.installed = true;
                Ok(Vec::new())
            }
            (0xE2, 0x09) => self.store_certificate(&apdu.data),
            (0xE2, 0x89) => self.store_key_parameters(&apdu.data),
            _ => Err(SW_INS_NOT_SUPPORTED),
        };
        match result {
            Ok(data) => ResponseApdu {
                data,
                sw: SW_SUCCESS,
            },
            Err(sw) => ResponseApdu {
                data: Vec::new(),
                sw,
            },
        }
    }

    fn store_certificate(&mut self, data: &[u8]) -> Result<Vec<u8>, u16> {
        if !self.installed {
            return Err(SW_CONDITIONS_NOT_SATISFIED);
        }
        let (certificate, _) = decode_tlv_expect(Cursor::new(data), tags::OFF_CARD_CERTIFICATE)
            .map_err(|_| SW_WRONG_DATA)?;
        let record = CertificateRecord::from_bytes(certificate).map_err(|_| SW_WRONG_DATA)?;
        let trusted = self
            .config
            .trust
            .verify(&record, &self.config.registry, today())
            .map_err(|_| SW_WRONG_DATA)?;
        self.off_card = Some(trusted);

        let challenge = random_bytes();
        self.challenge = Some(challenge);
        Ok(challenge.to_vec())
    }

    fn store_key_parameters(&mut self, data: &[u8]) -> Result<Vec<u8>, u16> {
        let (Some(_), Some(challenge)) = (&self.off_card, self.challenge.take()) else {
            return Err(SW_CONDITIONS_NOT_SATISFIED);
        };
        let params = KeyParameters::from_bytes(data).map_err(|_| SW_WRONG_DATA)?;
        let ephemeral = verify_key_parameters(&params, &challenge, &self.config.registry)
            .map_err(|_| SW_WRONG_DATA)?;
        let crt = params.template().map_err(|_| SW_WRONG_DATA)?;

        let derivation_random = crt
            .scenario
            .contains(ScenarioFlags::INCLUDE_DERIVATION_RANDOM)
            .then(random_bytes::<16>);
        let dr = derivation_random.as_ref().map(|dr| dr.as_slice());

        let shared_info =
            shared_info_for(&crt, dr, self.certificate.ecasd_image_number.as_deref())
                .map_err(|_| SW_WRONG_DATA)?;
        let key_count = crt.qualifier.key_count();
        let key_length = usize::from(crt.key_length);
        let bits = self
            .config
            .key_data_bits
            .max((key_count + 1) * key_length * 8);
        let material = compute_key_data(&self.ecasd_key, &ephemeral, &shared_info, bits)
            .map_err(|_| SW_WRONG_DATA)?;
        let keys = material
            .split(key_length, key_count)
            .map_err(|_| SW_WRONG_DATA)?;

        let host = crt.host.as_ref();
        let params = ReceiptParams {
            derivation_random: dr,
            sdin: host.map(|h| h.sdin.as_slice()),
            host_id: host.map(|h| h.host_id.as_slice()),
            ..ReceiptParams::new(crt.key_id, crt.key_version, crt.scenario)
        };
        let mut receipt = compute_receipt(&params, keys.receipt_key()).map_err(|_| SW_WRONG_DATA)?;
        if self.corrupt_receipt {
            receipt[15] ^= 0x01;
        }
        self.keys = Some(keys);

        KeyEstablishmentResponse {
            derivation_random: dr.map(<[u8]>::to_vec),
            receipt: receipt.to_vec(),
        }
        .to_bytes()
        .map_err(|_| SW_WRONG_DATA)
    }
}
