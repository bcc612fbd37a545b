use rsp_core::{TlvError, append_length};

use crate::types::{KeyQualifier, KeyType};

/**
    KDF shared info for ECKA key derivation (GlobalPlatform Amendment E, 3.1.1):

      qualifier ‖ key type ‖ key length
        [‖ derivation random]
        [‖ len(host id) ‖ host id]
        [‖ len(SIN) ‖ SIN ‖ len(SDIN) ‖ SDIN]

    Lengths are BER lengths. The SIN/SDIN pair is only emitted when both
    are present.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedInfo<'a> {
    pub qualifier: KeyQualifier,
    pub key_type: KeyType,
    pub key_length: u8,
    pub derivation_random: Option<&'a [u8]>,
    pub host_id: Option<&'a [u8]>,
    pub sin: Option<&'a [u8]>,
    pub sdin: Option<&'a [u8]>,
}

impl<'a> SharedInfo<'a> {
    /// AES-128 key derivation for `qualifier`, no optional fields.
    pub const fn new(qualifier: KeyQualifier) -> Self {
        Self {
            qualifier,
            key_type: KeyType::Aes,
            key_length: 16,
            derivation_random: None,
            host_id: None,
            sin: None,
            sdin: None,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TlvError> {
        let mut out = vec![self.qualifier.to_u8(), self.key_type.to_u8(), self.key_length];
        if let Some(dr) = self.derivation_random {
            out.extend_from_slice(dr);
        }
        if let Some(host_id) = self.host_id {
            append_length(&mut out, host_id.len())?;
            out.extend_from_slice(host_id);
        }
        if let (Some(sin), Some(sdin)) = (self.sin, self.sdin) {
            append_length(&mut out, sin.len())?;
            out.extend_from_slice(sin);
            append_length(&mut out, sdin.len())?;
            out.extend_from_slice(sdin);
        }
        Ok(out)
    }
}
