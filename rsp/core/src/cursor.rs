use crate::error::TlvError;

/**
    Read position over an immutable byte slice.

    A `Cursor` is a plain value: every read returns the decoded item together
    with a new cursor advanced past it, and the original cursor is left as it
    was. Callers can keep an earlier cursor around to backtrack or to restart
    a sequence without any shared mutable state.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub const fn position(self) -> usize {
        self.pos
    }

    pub fn remaining(self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub const fn remaining_len(self) -> usize {
        self.data.len() - self.pos
    }

    pub const fn is_empty(self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn peek_u8(self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    pub fn read_u8(self) -> Result<(u8, Self), TlvError> {
        let (bytes, next) = self.read_bytes(1)?;
        Ok((bytes[0], next))
    }

    pub fn read_bytes(self, n: usize) -> Result<(&'a [u8], Self), TlvError> {
        let available = self.remaining_len();
        if n > available {
            return Err(TlvError::Truncated {
                needed: n,
                available,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        Ok((
            bytes,
            Self {
                data: self.data,
                pos: self.pos + n,
            },
        ))
    }

    /**
        Read an unsigned big-endian integer of `n` bytes (at most 8).
    */
    pub fn read_be(self, n: usize) -> Result<(u64, Self), TlvError> {
        debug_assert!(n <= 8);
        let (bytes, next) = self.read_bytes(n)?;
        let value = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        Ok((value, next))
    }
}
