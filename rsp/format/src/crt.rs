/*!
    Control Reference Template for key agreement (tag A6).

    Element order inside A6:
    - `90 02 03 xx`   scenario #3 and its option bits
    - `95 01 xx`      key usage qualifier
    - `96 01 xx`      key access (optional)
    - `80 01 xx`      key type
    - `81 01 xx`      key length
    - `82 01 xx`      key identifier
    - `83 01 xx`      key version number
    - `91 ..`         initial SCP81 counter (`91 00` when none)
    - `45 ..`, `84 ..` SDIN and host identifier (both or neither)
*/

use rsp_core::tags;
use rsp_core::{Cursor, TagWidth, Tlvs, append_tlv, decode_tlv_expect};

use crate::error::{FormatError, FormatResult};
use crate::types::{KeyQualifier, KeyType, ScenarioFlags};

/**
    Security Domain Image Number and host identifier pair.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostIdentification {
    pub sdin: Vec<u8>,
    pub host_id: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlReferenceTemplate {
    /// Option bits without `SDIN_INCLUDED`; that bit follows `host`.
    pub scenario: ScenarioFlags,
    pub qualifier: KeyQualifier,
    pub key_access: Option<u8>,
    pub key_type: KeyType,
    pub key_length: u8,
    pub key_id: u8,
    pub key_version: u8,
    pub initial_counter: Option<Vec<u8>>,
    pub host: Option<HostIdentification>,
}

impl ControlReferenceTemplate {
    /**
        A single AES-128 key template with no options set.
    */
    pub fn new(key_id: u8, key_version: u8) -> Self {
        Self {
            scenario: ScenarioFlags::NONE,
            qualifier: KeyQualifier::SingleKey,
            key_access: None,
            key_type: KeyType::Aes,
            key_length: 16,
            key_id,
            key_version,
            initial_counter: None,
            host: None,
        }
    }

    pub fn with_key(mut self, key_type: KeyType, key_length: u8) -> Self {
        self.key_type = key_type;
        self.key_length = key_length;
        self
    }

    pub fn with_key_access(mut self, key_access: u8) -> Self {
        self.key_access = Some(key_access);
        self
    }

    /// Initial SCP81 counter. An empty counter encodes as `91 00`.
    pub fn with_initial_counter(mut self, counter: &[u8]) -> Self {
        self.initial_counter = (!counter.is_empty()).then(|| counter.to_vec());
        self
    }

    /// The option bits as they go on the wire.
    pub fn effective_scenario(&self) -> ScenarioFlags {
        match self.host {
            Some(_) => self.scenario.with(ScenarioFlags::SDIN_INCLUDED),
            None => self.scenario,
        }
    }

    pub fn to_bytes(&self) -> FormatResult<Vec<u8>> {
        let mut body = Vec::with_capacity(32);
        append_tlv(
            &mut body,
            tags::CRT_SCENARIO,
            &[ScenarioFlags::SCENARIO_ID, self.effective_scenario().bits()],
        )?;
        append_tlv(&mut body, tags::CRT_KEY_USAGE_QUALIFIER, &[self.qualifier.to_u8()])?;
        if let Some(access) = self.key_access {
            append_tlv(&mut body, tags::CRT_KEY_ACCESS, &[access])?;
        }
        append_tlv(&mut body, tags::CRT_KEY_TYPE, &[self.key_type.to_u8()])?;
        append_tlv(&mut body, tags::CRT_KEY_LENGTH, &[self.key_length])?;
        append_tlv(&mut body, tags::CRT_KEY_ID, &[self.key_id])?;
        append_tlv(&mut body, tags::CRT_KEY_VERSION, &[self.key_version])?;
        append_tlv(
            &mut body,
            tags::CRT_INITIAL_COUNTER,
            self.initial_counter.as_deref().unwrap_or(&[]),
        )?;
        if let Some(host) = &self.host {
            append_tlv(&mut body, tags::CRT_SDIN, &host.sdin)?;
            append_tlv(&mut body, tags::CRT_HOST_ID, &host.host_id)?;
        }

        let mut out = Vec::with_capacity(body.len() + 3);
        append_tlv(&mut out, tags::CRT, &body)?;
        Ok(out)
    }

    pub fn from_bytes(data: &[u8]) -> FormatResult<Self> {
        let (body, rest) = decode_tlv_expect(Cursor::new(data), tags::CRT)?;
        if !rest.is_empty() {
            return Err(FormatError::InvalidCrt(format!(
                "{} trailing bytes",
                rest.remaining_len()
            )));
        }

        let mut scenario = None;
        let mut qualifier = None;
        let mut key_access = None;
        let mut key_type = None;
        let mut key_length = None;
        let mut key_id = None;
        let mut key_version = None;
        let mut initial_counter = None;
        let mut sdin = None;
        let mut host_id = None;

        for tlv in Tlvs::new(body, TagWidth::One) {
            let tlv = tlv?;
            match tlv.tag {
                t if t == tags::CRT_SCENARIO => match tlv.value {
                    [ScenarioFlags::SCENARIO_ID, bits] => {
                        scenario =
                            Some(ScenarioFlags(*bits).without(ScenarioFlags::SDIN_INCLUDED));
                    }
                    _ => {
                        return Err(FormatError::InvalidCrt(format!(
                            "unsupported scenario {}",
                            hex::encode_upper(tlv.value)
                        )));
                    }
                },
                t if t == tags::CRT_KEY_USAGE_QUALIFIER => {
                    let b = single_byte(tlv.value, "key usage qualifier")?;
                    qualifier =
                        Some(KeyQualifier::from_u8(b).ok_or(FormatError::UnknownKeyQualifier(b))?);
                }
                t if t == tags::CRT_KEY_ACCESS => {
                    key_access = Some(single_byte(tlv.value, "key access")?);
                }
                t if t == tags::CRT_KEY_TYPE => {
                    let b = single_byte(tlv.value, "key type")?;
                    key_type = Some(KeyType::from_u8(b).ok_or(FormatError::UnknownKeyType(b))?);
                }
                t if t == tags::CRT_KEY_LENGTH => {
                    key_length = Some(single_byte(tlv.value, "key length")?);
                }
                t if t == tags::CRT_KEY_ID => key_id = Some(single_byte(tlv.value, "key id")?),
                t if t == tags::CRT_KEY_VERSION => {
                    key_version = Some(single_byte(tlv.value, "key version")?);
                }
                t if t == tags::CRT_INITIAL_COUNTER => {
                    initial_counter = (!tlv.value.is_empty()).then(|| tlv.value.to_vec());
                }
                t if t == tags::CRT_SDIN => sdin = Some(tlv.value.to_vec()),
                t if t == tags::CRT_HOST_ID => host_id = Some(tlv.value.to_vec()),
                other => {
                    return Err(FormatError::InvalidCrt(format!("unexpected tag {other}")));
                }
            }
        }

        let host = match (sdin, host_id) {
            (Some(sdin), Some(host_id)) => Some(HostIdentification { sdin, host_id }),
            (None, None) => None,
            _ => {
                return Err(FormatError::InvalidCrt(
                    "SDIN and host id must appear together".into(),
                ));
            }
        };

        let missing = |what: &str| FormatError::InvalidCrt(format!("missing {what}"));
        Ok(Self {
            scenario: scenario.ok_or_else(|| missing("scenario"))?,
            qualifier: qualifier.ok_or_else(|| missing("key usage qualifier"))?,
            key_access,
            key_type: key_type.ok_or_else(|| missing("key type"))?,
            key_length: key_length.ok_or_else(|| missing("key length"))?,
            key_id: key_id.ok_or_else(|| missing("key id"))?,
            key_version: key_version.ok_or_else(|| missing("key version"))?,
            initial_counter,
            host,
        })
    }
}

fn single_byte(value: &[u8], what: &str) -> FormatResult<u8> {
    match value {
        [b] => Ok(*b),
        _ => Err(FormatError::InvalidCrt(format!(
            "{what} must be 1 byte, got {}",
            value.len()
        ))),
    }
}
