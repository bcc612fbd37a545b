/*!
    Command and response APDUs for on-card key establishment.

    - INSTALL [for personalization]:  `80 E6 20 00`, data `00 00 len(aid) aid 00 00 00`
    - STORE DATA (certificate):       `80 E2 09 00`, data `3A01 { certificate }`
    - STORE DATA (key parameters):    `80 E2 89 01`, data `3A02 ‖ 7F49 ‖ 5F37`

    The card answers the last command with `85 { derivation random }` (when
    requested by the scenario) and `86 { receipt }`.
*/

use core::fmt;

use rsp_core::tags;
use rsp_core::{Cursor, TagWidth, append_tlv, decode_tlv};

use crate::error::{FormatError, FormatResult};
use crate::key_parameters::KeyParameters;

pub const CLA_GP: u8 = 0x80;
pub const INS_INSTALL: u8 = 0xE6;
pub const INS_STORE_DATA: u8 = 0xE2;
pub const P1_INSTALL_FOR_PERSONALIZATION: u8 = 0x20;
/// STORE DATA P1: BER-TLV data, more blocks follow.
pub const P1_STORE_DATA_TLV: u8 = 0x09;
/// STORE DATA P1: BER-TLV data, last block.
pub const P1_STORE_DATA_TLV_LAST: u8 = 0x89;

pub const SW_SUCCESS: u16 = 0x9000;

/**
    A command APDU without an expected response length.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apdu {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: Vec<u8>,
}

impl Apdu {
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8, data: Vec<u8>) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data,
        }
    }

    /**
        Serialize with a short Lc (1 byte) up to 255 data bytes and an
        extended Lc (`00 xx xx`) up to 65535.
    */
    pub fn to_bytes(&self) -> FormatResult<Vec<u8>> {
        let len = self.data.len();
        let mut out = Vec::with_capacity(len + 7);
        out.extend_from_slice(&[self.cla, self.ins, self.p1, self.p2]);
        match len {
            0 => {}
            1..=0xFF => out.push(len as u8),
            0x100..=0xFFFF => {
                out.push(0x00);
                out.extend_from_slice(&(len as u16).to_be_bytes());
            }
            _ => return Err(FormatError::ApduTooLong(len)),
        }
        out.extend_from_slice(&self.data);
        Ok(out)
    }
}

impl fmt::Display for Apdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X} {:02X} {:02X} {:02X} [{} bytes]",
            self.cla,
            self.ins,
            self.p1,
            self.p2,
            self.data.len()
        )
    }
}

/**
    INSTALL [for personalization] of the security domain that will run key
    establishment.
*/
pub fn install_for_key_establishment(aid: &[u8]) -> FormatResult<Apdu> {
    if !(5..=16).contains(&aid.len()) {
        return Err(FormatError::InvalidAid(aid.len()));
    }
    let mut data = Vec::with_capacity(aid.len() + 6);
    data.extend_from_slice(&[0x00, 0x00, aid.len() as u8]);
    data.extend_from_slice(aid);
    data.extend_from_slice(&[0x00, 0x00, 0x00]);
    Ok(Apdu::new(
        CLA_GP,
        INS_INSTALL,
        P1_INSTALL_FOR_PERSONALIZATION,
        0x00,
        data,
    ))
}

/**
    STORE DATA carrying the off-card entity's certificate.
*/
pub fn send_off_card_certificate(certificate: &[u8]) -> FormatResult<Apdu> {
    let mut data = Vec::with_capacity(certificate.len() + 5);
    append_tlv(&mut data, tags::OFF_CARD_CERTIFICATE, certificate)?;
    Ok(Apdu::new(
        CLA_GP,
        INS_STORE_DATA,
        P1_STORE_DATA_TLV,
        0x00,
        data,
    ))
}

/**
    STORE DATA carrying signed ephemeral key parameters (last block, P2 = 1).
*/
pub fn store_key_parameters(params: &KeyParameters) -> FormatResult<Apdu> {
    Ok(Apdu::new(
        CLA_GP,
        INS_STORE_DATA,
        P1_STORE_DATA_TLV_LAST,
        0x01,
        params.to_bytes()?,
    ))
}

/**
    A response APDU: data followed by the two status bytes.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseApdu {
    pub data: Vec<u8>,
    pub sw: u16,
}

impl ResponseApdu {
    pub fn from_bytes(bytes: &[u8]) -> FormatResult<Self> {
        let Some((data, sw)) = bytes.split_last_chunk::<2>() else {
            return Err(FormatError::InvalidResponse(format!(
                "{} bytes is too short for a status word",
                bytes.len()
            )));
        };
        Ok(Self {
            data: data.to_vec(),
            sw: u16::from_be_bytes(*sw),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        out.extend_from_slice(&self.sw.to_be_bytes());
        out
    }

    pub const fn is_success(&self) -> bool {
        self.sw == SW_SUCCESS
    }
}

/**
    Response data to the key parameters STORE DATA.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEstablishmentResponse {
    pub derivation_random: Option<Vec<u8>>,
    pub receipt: Vec<u8>,
}

impl KeyEstablishmentResponse {
    pub fn from_bytes(data: &[u8]) -> FormatResult<Self> {
        let mut derivation_random = None;
        let mut receipt = None;

        let mut cursor = Cursor::new(data);
        while !cursor.is_empty() {
            let (tlv, next) = decode_tlv(cursor, TagWidth::One)?;
            cursor = next;
            if tlv.tag == tags::DERIVATION_RANDOM {
                derivation_random = Some(tlv.value.to_vec());
            } else if tlv.tag == tags::RECEIPT {
                receipt = Some(tlv.value.to_vec());
            } else {
                return Err(FormatError::InvalidResponse(format!(
                    "unexpected tag {}",
                    tlv.tag
                )));
            }
        }

        Ok(Self {
            derivation_random,
            receipt: receipt.ok_or(FormatError::MissingField("receipt"))?,
        })
    }

    pub fn to_bytes(&self) -> FormatResult<Vec<u8>> {
        let mut out = Vec::new();
        if let Some(dr) = &self.derivation_random {
            append_tlv(&mut out, tags::DERIVATION_RANDOM, dr)?;
        }
        append_tlv(&mut out, tags::RECEIPT, &self.receipt)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn install_command() {
        let apdu = install_for_key_establishment(&hex!("A000000559 1010FFFFFFFF8900000100"))
            .unwrap();
        assert_eq!(
            apdu.to_bytes().unwrap(),
            hex!("80E62000 16 0000 10 A0000005591010FFFFFFFF8900000100 000000")
        );
        assert_eq!(apdu.to_string(), "80 E6 20 00 [22 bytes]");
    }

    #[test]
    fn install_rejects_bad_aid() {
        assert_eq!(
            install_for_key_establishment(&hex!("A000")),
            Err(FormatError::InvalidAid(2))
        );
    }

    #[test]
    fn certificate_command_uses_extended_length() {
        let cert = vec![0x5A; 300];
        let apdu = send_off_card_certificate(&cert).unwrap();
        assert_eq!(apdu.data[..5], hex!("3A01 82012C"));
        let bytes = apdu.to_bytes().unwrap();
        assert_eq!(bytes[..7], hex!("80E20900 000131"));
        assert_eq!(bytes.len(), 7 + 305);
    }

    #[test]
    fn too_long_apdu() {
        let apdu = Apdu::new(0x80, 0xE2, 0x09, 0x00, vec![0; 0x1_0000]);
        assert_eq!(apdu.to_bytes(), Err(FormatError::ApduTooLong(0x1_0000)));
    }

    #[test]
    fn response_parsing() {
        let response =
            ResponseApdu::from_bytes(&hex!("8502AABB 8610 00112233445566778899AABBCCDDEEFF 9000"))
                .unwrap();
        assert!(response.is_success());
        let parsed = KeyEstablishmentResponse::from_bytes(&response.data).unwrap();
        assert_eq!(parsed.derivation_random.as_deref(), Some(&hex!("AABB")[..]));
        assert_eq!(parsed.receipt, hex!("00112233445566778899AABBCCDDEEFF"));
        assert_eq!(parsed.to_bytes().unwrap(), response.data);

        assert!(ResponseApdu::from_bytes(&hex!("90")).is_err());
        assert_eq!(
            KeyEstablishmentResponse::from_bytes(&hex!("8502AABB")),
            Err(FormatError::MissingField("receipt"))
        );
    }
}
