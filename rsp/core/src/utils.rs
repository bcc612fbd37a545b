/**
    Decode a hex string, ignoring ASCII whitespace anywhere in it.
    Accepts both upper and lower case digits.
*/
pub fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let compact: String = s.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(compact)
}

pub fn encode_hex_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/**
    Encode `value` as exactly `width` big-endian bytes, keeping the low-order
    bytes when `width` is smaller than 8.
*/
pub fn encode_be(value: u64, width: usize) -> Vec<u8> {
    (0..width)
        .rev()
        .map(|i| if i < 8 { (value >> (8 * i)) as u8 } else { 0 })
        .collect()
}

/**
    Decode an unsigned big-endian integer. Returns `None` for more than 8
    significant bytes.
*/
pub fn decode_be(bytes: &[u8]) -> Option<u64> {
    let bytes = unsigned_be(bytes);
    if bytes.len() > 8 {
        return None;
    }
    Some(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

pub fn encode_le(value: u64, width: usize) -> Vec<u8> {
    let mut out = encode_be(value, width);
    out.reverse();
    out
}

pub fn decode_le(bytes: &[u8]) -> Option<u64> {
    let mut be = bytes.to_vec();
    be.reverse();
    decode_be(&be)
}

/**
    Strip leading zero bytes, keeping an empty slice for zero.
*/
pub fn unsigned_be(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/**
    Left-pad an unsigned big-endian integer with zeros to `width` bytes.
    Leading zeros beyond `width` are dropped; `None` if the significant
    bytes do not fit.
*/
pub fn left_pad(bytes: &[u8], width: usize) -> Option<Vec<u8>> {
    let significant = unsigned_be(bytes);
    if significant.len() > width {
        return None;
    }
    let mut out = vec![0u8; width - significant.len()];
    out.extend_from_slice(significant);
    Some(out)
}

/**
    ISO/IEC 9797-1 padding method 2: append 0x80, then zeros up to a multiple
    of `block_size`. Always adds at least one byte.
*/
pub fn pad80(data: &[u8], block_size: usize) -> Vec<u8> {
    let padded_len = (data.len() / block_size + 1) * block_size;
    let mut out = Vec::with_capacity(padded_len);
    out.extend_from_slice(data);
    out.push(0x80);
    out.resize(padded_len, 0x00);
    out
}

/**
    Const-compatible ASCII whitespace trimming (both ends).
*/
pub const fn trim_ascii(s: &[u8]) -> &[u8] {
    let mut start = 0;
    while start < s.len() && s[start].is_ascii_whitespace() {
        start += 1;
    }
    let mut end = s.len();
    while end > start && s[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    let (_, tail) = s.split_at(start);
    let (trimmed, _) = tail.split_at(end - start);
    trimmed
}

/**
    Const-compatible case-insensitive ASCII byte comparison.
*/
pub const fn eq_ignore_ascii_case(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i].to_ascii_lowercase() != b[i].to_ascii_lowercase() {
            return false;
        }
        i += 1;
    }
    true
}
