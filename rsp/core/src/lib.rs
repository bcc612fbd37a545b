#![allow(clippy::doc_overindented_list_items)]

mod cursor;
mod dgi;
mod error;
mod tlv;

pub mod tags;
pub mod utils;

pub use self::cursor::Cursor;
pub use self::dgi::{Dgi, MAX_DGI_LENGTH, append_dgi, decode_dgi};
pub use self::error::{ParseError, TlvError};
pub use self::tlv::{
    MAX_TLV_LENGTH, Tag, TagWidth, Tlv, TlvIter, Tlvs, append_length, append_tlv, decode_all,
    decode_tlv, decode_tlv_expect, encode_tlv, read_length, read_tag,
};
pub use self::utils::{eq_ignore_ascii_case, trim_ascii};
