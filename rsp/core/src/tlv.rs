/*!
    BER-TLV encoding and decoding.

    Element layout: tag (1 or 2 bytes) + length + value.

    Length encoding (output is always the shortest form):
    - 0..=127:            one byte
    - 128..=255:          `81 xx`
    - 256..=65535:        `82 xx xx`
    - 65536..=16777215:   `83 xx xx xx`

    Tag width is not self-describing in this protocol (the DGI-style tags
    `3A01`, `3A02` and the signing-only tag `0085` break BER tag-number rules),
    so decoders are told how wide tags are through [`TagWidth`].
*/

use core::fmt;

use crate::cursor::Cursor;
use crate::error::TlvError;

/// Largest value length representable with the `83` long form.
pub const MAX_TLV_LENGTH: usize = 0xFF_FFFF;

/**
    A one- or two-byte tag.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Single(u8),
    Double([u8; 2]),
}

impl Tag {
    /**
        Build a two-byte tag from its big-endian value, e.g. `0x7F49`.
    */
    pub const fn double(value: u16) -> Self {
        Self::Double(value.to_be_bytes())
    }

    pub const fn width(self) -> TagWidth {
        match self {
            Self::Single(_) => TagWidth::One,
            Self::Double(_) => TagWidth::Two,
        }
    }

    pub const fn byte_len(self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Double(_) => 2,
        }
    }

    pub fn append_to(self, out: &mut Vec<u8>) {
        match self {
            Self::Single(b) => out.push(b),
            Self::Double(bytes) => out.extend_from_slice(&bytes),
        }
    }
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        Self::Single(value)
    }
}

impl From<[u8; 2]> for Tag {
    fn from(value: [u8; 2]) -> Self {
        Self::Double(value)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(b) => write!(f, "{b:02X}"),
            Self::Double([a, b]) => write!(f, "{a:02X}{b:02X}"),
        }
    }
}

/**
    How many bytes a decoder should consume for the tag.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagWidth {
    One,
    Two,
    /// Two bytes when the first byte is 0x5F or 0x7F, one byte otherwise.
    Auto,
}

impl TagWidth {
    pub const fn for_first_byte(self, first: u8) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Auto => match first {
                0x5F | 0x7F => 2,
                _ => 1,
            },
        }
    }
}

/**
    One decoded element. The value borrows from the input buffer.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tag: Tag,
    pub value: &'a [u8],
}

impl Tlv<'_> {
    pub fn encoded_len(&self) -> usize {
        self.tag.byte_len() + length_of_length(self.value.len()) + self.value.len()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TlvError> {
        encode_tlv(self.tag, self.value)
    }
}

const fn length_of_length(len: usize) -> usize {
    match len {
        0..=0x7F => 1,
        0x80..=0xFF => 2,
        0x100..=0xFFFF => 3,
        _ => 4,
    }
}

/**
    Append a BER length in its shortest form.
*/
pub fn append_length(out: &mut Vec<u8>, len: usize) -> Result<(), TlvError> {
    match len {
        0..=0x7F => out.push(len as u8),
        0x80..=0xFF => out.extend_from_slice(&[0x81, len as u8]),
        0x100..=0xFFFF => {
            out.push(0x82);
            out.extend_from_slice(&(len as u16).to_be_bytes());
        }
        0x1_0000..=MAX_TLV_LENGTH => {
            out.push(0x83);
            out.extend_from_slice(&(len as u32).to_be_bytes()[1..]);
        }
        _ => return Err(TlvError::LengthTooLarge(len)),
    }
    Ok(())
}

/**
    Append `tag ‖ length ‖ value` to `out`.
*/
pub fn append_tlv(out: &mut Vec<u8>, tag: Tag, value: &[u8]) -> Result<(), TlvError> {
    if value.len() > MAX_TLV_LENGTH {
        return Err(TlvError::LengthTooLarge(value.len()));
    }
    out.reserve(tag.byte_len() + length_of_length(value.len()) + value.len());
    tag.append_to(out);
    append_length(out, value.len())?;
    out.extend_from_slice(value);
    Ok(())
}

pub fn encode_tlv(tag: Tag, value: &[u8]) -> Result<Vec<u8>, TlvError> {
    let mut out = Vec::new();
    append_tlv(&mut out, tag, value)?;
    Ok(out)
}

/**
    Read a BER length.
*/
pub fn read_length(cursor: Cursor<'_>) -> Result<(usize, Cursor<'_>), TlvError> {
    let (first, cursor) = cursor.read_u8()?;
    match first {
        0x00..=0x7F => Ok((first as usize, cursor)),
        0x81..=0x83 => {
            let n = (first - 0x80) as usize;
            let (len, cursor) = cursor.read_be(n)?;
            Ok((len as usize, cursor))
        }
        0xFF => Err(TlvError::UnusedLength),
        _ => Err(TlvError::MalformedLength(first)),
    }
}

pub fn read_tag(cursor: Cursor<'_>, width: TagWidth) -> Result<(Tag, Cursor<'_>), TlvError> {
    let (first, next) = cursor.read_u8()?;
    match width.for_first_byte(first) {
        1 => Ok((Tag::Single(first), next)),
        _ => {
            let (second, next) = next.read_u8()?;
            Ok((Tag::Double([first, second]), next))
        }
    }
}

/**
    Decode one element at the cursor.
*/
pub fn decode_tlv(cursor: Cursor<'_>, width: TagWidth) -> Result<(Tlv<'_>, Cursor<'_>), TlvError> {
    let (tag, cursor) = read_tag(cursor, width)?;
    let (len, cursor) = read_length(cursor)?;
    let (value, cursor) = cursor.read_bytes(len)?;
    Ok((Tlv { tag, value }, cursor))
}

/**
    Decode one element whose tag must be `expected`. The tag is read with the
    width of `expected`.
*/
pub fn decode_tlv_expect(
    cursor: Cursor<'_>,
    expected: Tag,
) -> Result<(&[u8], Cursor<'_>), TlvError> {
    let (tlv, cursor) = decode_tlv(cursor, expected.width())?;
    if tlv.tag != expected {
        return Err(TlvError::UnexpectedTag {
            expected,
            actual: tlv.tag,
        });
    }
    Ok((tlv.value, cursor))
}

/**
    A lazily decoded sequence of sibling elements.

    `Tlvs` is `Copy` and holds only the input slice, so iterating it twice
    decodes the buffer from the start both times. Each element is decoded
    independently; the iterator yields the first error and then ends.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlvs<'a> {
    data: &'a [u8],
    width: TagWidth,
}

impl<'a> Tlvs<'a> {
    pub const fn new(data: &'a [u8], width: TagWidth) -> Self {
        Self { data, width }
    }

    pub fn iter(&self) -> TlvIter<'a> {
        TlvIter {
            cursor: Cursor::new(self.data),
            width: self.width,
            failed: false,
        }
    }

    /**
        Find the first element with `tag`. Decoding errors before it propagate.
    */
    pub fn find(&self, tag: Tag) -> Result<Option<&'a [u8]>, TlvError> {
        for tlv in self.iter() {
            let tlv = tlv?;
            if tlv.tag == tag {
                return Ok(Some(tlv.value));
            }
        }
        Ok(None)
    }
}

impl<'a> IntoIterator for Tlvs<'a> {
    type Item = Result<Tlv<'a>, TlvError>;
    type IntoIter = TlvIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/**
    Decode every element in `data`, using 0x5F/0x7F to detect two-byte tags.
*/
pub fn decode_all(data: &[u8]) -> Tlvs<'_> {
    Tlvs::new(data, TagWidth::Auto)
}

pub struct TlvIter<'a> {
    cursor: Cursor<'a>,
    width: TagWidth,
    failed: bool,
}

impl<'a> Iterator for TlvIter<'a> {
    type Item = Result<Tlv<'a>, TlvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_empty() {
            return None;
        }
        match decode_tlv(self.cursor, self.width) {
            Ok((tlv, next)) => {
                self.cursor = next;
                Some(Ok(tlv))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn length_bytes(len: usize) -> Vec<u8> {
        let mut out = Vec::new();
        append_length(&mut out, len).unwrap();
        out
    }

    #[test]
    fn length_boundaries() {
        assert_eq!(length_bytes(0), hex!("00"));
        assert_eq!(length_bytes(127), hex!("7F"));
        assert_eq!(length_bytes(128), hex!("8180"));
        assert_eq!(length_bytes(255), hex!("81FF"));
        assert_eq!(length_bytes(256), hex!("820100"));
        assert_eq!(length_bytes(65535), hex!("82FFFF"));
        assert_eq!(length_bytes(65536), hex!("83010000"));
        assert_eq!(length_bytes(MAX_TLV_LENGTH), hex!("83FFFFFF"));
    }

    #[test]
    fn length_too_large() {
        let mut out = Vec::new();
        let err = append_length(&mut out, MAX_TLV_LENGTH + 1).unwrap_err();
        assert_eq!(err, TlvError::LengthTooLarge(MAX_TLV_LENGTH + 1));
    }

    #[test]
    fn round_trip_across_length_forms() {
        let cases = [
            (Tag::Single(0x93), TagWidth::One),
            (Tag::Single(0x93), TagWidth::Auto),
            (Tag::double(0x7F21), TagWidth::Two),
            (Tag::double(0x7F21), TagWidth::Auto),
            (Tag::double(0x5F37), TagWidth::Auto),
        ];
        for (tag, width) in cases {
            for len in [0usize, 1, 127, 128, 255, 256, 65535, 65536] {
                let value: Vec<u8> = (0..len).map(|i| i as u8).collect();
                let encoded = encode_tlv(tag, &value).unwrap();
                let (tlv, rest) = decode_tlv(Cursor::new(&encoded), width).unwrap();
                assert_eq!(tlv.tag, tag, "{tag} {width:?} len {len}");
                assert_eq!(tlv.value, value.as_slice(), "{tag} {width:?} len {len}");
                assert!(rest.is_empty());
                assert_eq!(tlv.encoded_len(), encoded.len());
            }
        }
    }

    #[test]
    fn two_byte_tag_round_trip() {
        let encoded = encode_tlv(Tag::double(0x7F49), &hex!("B0 01 04")).unwrap();
        assert_eq!(encoded, hex!("7F49 03 B00104"));
        let (tlv, _) = decode_tlv(Cursor::new(&encoded), TagWidth::Auto).unwrap();
        assert_eq!(tlv.tag, Tag::double(0x7F49));
        assert_eq!(tlv.tag.to_string(), "7F49");
    }

    #[test]
    fn malformed_and_unused_lengths() {
        let err = decode_tlv(Cursor::new(&hex!("93 80 00")), TagWidth::One).unwrap_err();
        assert_eq!(err, TlvError::MalformedLength(0x80));
        let err = decode_tlv(Cursor::new(&hex!("93 84 00000001 00")), TagWidth::One).unwrap_err();
        assert_eq!(err, TlvError::MalformedLength(0x84));
        let err = decode_tlv(Cursor::new(&hex!("93 FF 00")), TagWidth::One).unwrap_err();
        assert_eq!(err, TlvError::UnusedLength);
    }

    #[test]
    fn truncated_value() {
        let err = decode_tlv(Cursor::new(&hex!("93 05 0102")), TagWidth::One).unwrap_err();
        assert_eq!(
            err,
            TlvError::Truncated {
                needed: 5,
                available: 2
            }
        );
    }

    #[test]
    fn expect_reports_both_tags() {
        let data = hex!("42 01 AA");
        let err = decode_tlv_expect(Cursor::new(&data), Tag::Single(0x93)).unwrap_err();
        assert_eq!(
            err,
            TlvError::UnexpectedTag {
                expected: Tag::Single(0x93),
                actual: Tag::Single(0x42),
            }
        );
        let (value, rest) = decode_tlv_expect(Cursor::new(&data), Tag::Single(0x42)).unwrap();
        assert_eq!(value, &[0xAA]);
        assert!(rest.is_empty());
    }

    #[test]
    fn expect_uses_width_of_expected_tag() {
        // 3A is not a BER two-byte marker, but the expected tag is two bytes.
        let data = hex!("3A02 02 A600");
        let (value, _) = decode_tlv_expect(Cursor::new(&data), Tag::double(0x3A02)).unwrap();
        assert_eq!(value, hex!("A600"));
    }

    #[test]
    fn sequence_is_restartable() {
        let data = hex!("93 01 01  5F20 02 AABB  95 02 0080");
        let tlvs = decode_all(&data);
        let first: Vec<Tag> = tlvs.iter().map(|t| t.unwrap().tag).collect();
        let second: Vec<Tag> = tlvs.iter().map(|t| t.unwrap().tag).collect();
        assert_eq!(first, second);
        assert_eq!(
            first,
            [Tag::Single(0x93), Tag::double(0x5F20), Tag::Single(0x95)]
        );
        assert_eq!(tlvs.find(Tag::Single(0x95)).unwrap(), Some(&hex!("0080")[..]));
        assert_eq!(tlvs.find(Tag::Single(0x42)).unwrap(), None);
    }

    #[test]
    fn sequence_stops_after_error() {
        let data = hex!("93 01 01  95 05 00");
        let items: Vec<_> = decode_all(&data).into_iter().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(TlvError::Truncated { .. })));
    }
}
