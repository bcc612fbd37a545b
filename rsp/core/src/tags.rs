/*!
    Tag constants used by the certificate, CRT, shared-info and APDU payloads.
*/

use crate::tlv::Tag;

// ── Certificate ─────────────────────────────────────────────────────
pub const CERTIFICATE: Tag = Tag::double(0x7F21);
pub const SERIAL_NUMBER: Tag = Tag::Single(0x93);
pub const CA_KEY_ID: Tag = Tag::Single(0x42);
pub const SUBJECT_KEY_ID: Tag = Tag::double(0x5F20);
pub const KEY_USAGE: Tag = Tag::Single(0x95);
pub const EFFECTIVE_DATE: Tag = Tag::double(0x5F25);
pub const EXPIRATION_DATE: Tag = Tag::double(0x5F24);
pub const DISCRETIONARY_DATA: Tag = Tag::Single(0x73);
pub const DISCRETIONARY_DATA_PRIMITIVE: Tag = Tag::Single(0x53);
pub const PUBLIC_KEY: Tag = Tag::double(0x7F49);
pub const PUBLIC_KEY_MODULUS: Tag = Tag::double(0x5F38);
pub const SIGNATURE: Tag = Tag::double(0x5F37);
pub const SIGNATURE_ALT: Tag = Tag::Single(0x9E);
pub const ECASD_IMAGE_NUMBER: Tag = Tag::Single(0x45);

// ── Discretionary data ──────────────────────────────────────────────
pub const CERTIFICATE_TYPE: Tag = Tag::Single(0xC8);
pub const DISCRETIONARY_CA_KEY_ID: Tag = Tag::Single(0xC9);

// ── Public key template ─────────────────────────────────────────────
pub const EC_PUBLIC_POINT: Tag = Tag::Single(0xB0);
pub const KEY_PARAMETER_REFERENCE: Tag = Tag::Single(0xF0);

// ── Control reference template ──────────────────────────────────────
pub const CRT: Tag = Tag::Single(0xA6);
pub const CRT_SCENARIO: Tag = Tag::Single(0x90);
pub const CRT_KEY_USAGE_QUALIFIER: Tag = Tag::Single(0x95);
pub const CRT_KEY_ACCESS: Tag = Tag::Single(0x96);
pub const CRT_KEY_TYPE: Tag = Tag::Single(0x80);
pub const CRT_KEY_LENGTH: Tag = Tag::Single(0x81);
pub const CRT_KEY_ID: Tag = Tag::Single(0x82);
pub const CRT_KEY_VERSION: Tag = Tag::Single(0x83);
pub const CRT_INITIAL_COUNTER: Tag = Tag::Single(0x91);
pub const CRT_SDIN: Tag = Tag::Single(0x45);
pub const CRT_HOST_ID: Tag = Tag::Single(0x84);

// ── STORE DATA payloads ─────────────────────────────────────────────
pub const OFF_CARD_CERTIFICATE: Tag = Tag::double(0x3A01);
pub const KEY_PARAMETERS: Tag = Tag::double(0x3A02);
pub const RANDOM_CHALLENGE: Tag = Tag::double(0x0085);

// ── Card response ───────────────────────────────────────────────────
pub const DERIVATION_RANDOM: Tag = Tag::Single(0x85);
pub const RECEIPT: Tag = Tag::Single(0x86);
