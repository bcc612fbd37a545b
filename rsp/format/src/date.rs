/*!
    BCD-encoded certificate dates (tags 5F25 / 5F24).

    Certificates in the field carry either 3-byte `YYMMDD` (years 2000-2099)
    or 4-byte `YYYYMMDD`. Decoding accepts both and keeps the received bytes,
    since the signature covers them verbatim. Newly built dates are always
    `YYYYMMDD`.
*/

use core::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::{FormatError, FormatResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CertDate {
    date: NaiveDate,
    raw: Vec<u8>,
}

impl CertDate {
    pub fn from_bcd(bytes: &[u8]) -> FormatResult<Self> {
        let invalid = || FormatError::InvalidDate(hex::encode_upper(bytes));

        let digits = bytes
            .iter()
            .map(|&b| bcd_byte(b))
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(invalid)?;

        let (year, month, day) = match digits.as_slice() {
            [yy, mm, dd] => (2000 + *yy as i32, *mm, *dd),
            [cc, yy, mm, dd] => ((cc * 100 + yy) as i32, *mm, *dd),
            _ => return Err(invalid()),
        };

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
        Ok(Self {
            date,
            raw: bytes.to_vec(),
        })
    }

    /**
        Build a `YYYYMMDD` date. Years outside 0..=9999 cannot be encoded.
    */
    pub fn from_date(date: NaiveDate) -> FormatResult<Self> {
        let year = date.year();
        if !(0..=9999).contains(&year) {
            return Err(FormatError::InvalidDate(date.to_string()));
        }
        let year = year as u32;
        let raw = vec![
            to_bcd(year / 100),
            to_bcd(year % 100),
            to_bcd(date.month()),
            to_bcd(date.day()),
        ];
        Ok(Self { date, raw })
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The encoded bytes, as received or as built.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
}

impl fmt::Display for CertDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

const fn bcd_byte(b: u8) -> Option<u32> {
    let hi = b >> 4;
    let lo = b & 0x0F;
    if hi > 9 || lo > 9 {
        return None;
    }
    Some((hi * 10 + lo) as u32)
}

const fn to_bcd(v: u32) -> u8 {
    (((v / 10) << 4) | (v % 10)) as u8
}
