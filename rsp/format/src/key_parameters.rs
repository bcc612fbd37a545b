use rsp_core::tags;
use rsp_core::{Cursor, append_tlv, decode_tlv_expect};

use crate::certificate::EncodedPublicKey;
use crate::crt::ControlReferenceTemplate;
use crate::error::{FormatError, FormatResult};

/**
    STORE DATA payload carrying the off-card ephemeral key:

      3A02 { A6 CRT } ‖ 7F49 { B0 point ‖ F0 ref } ‖ 5F37 { signature }

    The signature covers the first two elements followed by `0085 challenge`,
    where the challenge is the random the card returned earlier.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParameters {
    /// Encoded A6 template, kept verbatim for signature checks.
    pub crt: Vec<u8>,
    pub public_key: EncodedPublicKey,
    pub signature: Vec<u8>,
}

impl KeyParameters {
    /**
        The to-be-signed buffer for `crt` and `public_key` under `challenge`.
    */
    pub fn signed_data(
        crt: &[u8],
        public_key: &EncodedPublicKey,
        challenge: &[u8],
    ) -> FormatResult<Vec<u8>> {
        let mut out = unsigned_prefix(crt, public_key)?;
        append_tlv(&mut out, tags::RANDOM_CHALLENGE, challenge)?;
        Ok(out)
    }

    pub fn to_bytes(&self) -> FormatResult<Vec<u8>> {
        let mut out = unsigned_prefix(&self.crt, &self.public_key)?;
        append_tlv(&mut out, tags::SIGNATURE, &self.signature)?;
        Ok(out)
    }

    pub fn from_bytes(data: &[u8]) -> FormatResult<Self> {
        let cursor = Cursor::new(data);
        let (crt, cursor) = decode_tlv_expect(cursor, tags::KEY_PARAMETERS)?;
        let (public_key, cursor) = decode_tlv_expect(cursor, tags::PUBLIC_KEY)?;
        let (signature, cursor) = decode_tlv_expect(cursor, tags::SIGNATURE)?;
        if !cursor.is_empty() {
            return Err(FormatError::TrailingData(cursor.remaining_len()));
        }
        Ok(Self {
            crt: crt.to_vec(),
            public_key: EncodedPublicKey::from_bytes(public_key)?,
            signature: signature.to_vec(),
        })
    }

    pub fn template(&self) -> FormatResult<ControlReferenceTemplate> {
        ControlReferenceTemplate::from_bytes(&self.crt)
    }
}

fn unsigned_prefix(crt: &[u8], public_key: &EncodedPublicKey) -> FormatResult<Vec<u8>> {
    let mut out = Vec::with_capacity(crt.len() + public_key.point.len() + 16);
    append_tlv(&mut out, tags::KEY_PARAMETERS, crt)?;
    append_tlv(&mut out, tags::PUBLIC_KEY, &public_key.to_bytes()?)?;
    Ok(out)
}
