/*!
    GlobalPlatform Data Grouping Identifier (DGI) encoding.

    A DGI element is a two-byte identifier followed by a length:
    - 0..=254:        one byte
    - 255..=65534:    `FF xx xx`

    Unlike BER-TLV, 0xFF is the long-form marker here rather than a reserved byte.
*/

use crate::cursor::Cursor;
use crate::error::TlvError;

pub const MAX_DGI_LENGTH: usize = 0xFFFE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dgi<'a> {
    pub tag: u16,
    pub value: &'a [u8],
}

pub fn append_dgi(out: &mut Vec<u8>, tag: u16, value: &[u8]) -> Result<(), TlvError> {
    let len = value.len();
    if len > MAX_DGI_LENGTH {
        return Err(TlvError::LengthTooLarge(len));
    }
    out.extend_from_slice(&tag.to_be_bytes());
    if len < 0xFF {
        out.push(len as u8);
    } else {
        out.push(0xFF);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    }
    out.extend_from_slice(value);
    Ok(())
}

pub fn decode_dgi(cursor: Cursor<'_>) -> Result<(Dgi<'_>, Cursor<'_>), TlvError> {
    let (tag, cursor) = cursor.read_be(2)?;
    let (first, cursor) = cursor.read_u8()?;
    let (len, cursor) = match first {
        0xFF => {
            let (len, cursor) = cursor.read_be(2)?;
            (len as usize, cursor)
        }
        short => (short as usize, cursor),
    };
    let (value, cursor) = cursor.read_bytes(len)?;
    Ok((
        Dgi {
            tag: tag as u16,
            value,
        },
        cursor,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn short_and_long_lengths() {
        let mut out = Vec::new();
        append_dgi(&mut out, 0x8010, &[0x11; 254]).unwrap();
        assert_eq!(&out[..3], hex!("8010 FE"));

        let mut out = Vec::new();
        append_dgi(&mut out, 0x8010, &[0x22; 255]).unwrap();
        assert_eq!(&out[..5], hex!("8010 FF 00FF"));

        let (dgi, rest) = decode_dgi(Cursor::new(&out)).unwrap();
        assert_eq!(dgi.tag, 0x8010);
        assert_eq!(dgi.value.len(), 255);
        assert!(rest.is_empty());
    }

    #[test]
    fn too_long() {
        let mut out = Vec::new();
        let value = vec![0u8; MAX_DGI_LENGTH + 1];
        let err = append_dgi(&mut out, 0x0101, &value).unwrap_err();
        assert_eq!(err, TlvError::LengthTooLarge(MAX_DGI_LENGTH + 1));
    }

    #[test]
    fn truncated() {
        let err = decode_dgi(Cursor::new(&hex!("0101 04 AABB"))).unwrap_err();
        assert!(matches!(err, TlvError::Truncated { needed: 4, .. }));
    }
}
