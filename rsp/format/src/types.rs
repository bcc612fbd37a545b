use core::fmt;
use core::ops::BitOr;
use core::str::FromStr;

use rsp_core::{ParseError, eq_ignore_ascii_case, trim_ascii};

/**
    GlobalPlatform key type codes as carried in CRTs and shared info.
    Ref: GlobalPlatform Card Specification, Table 11-16 (Key Type Coding).
*/
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyType {
    Des = 0x80,
    Aes = 0x88,
    EccPublic = 0xB0,
    EccPrivate = 0xB1,
    EccKeyParameters = 0xF0,
}

impl KeyType {
    pub const fn from_u8(u: u8) -> Option<Self> {
        match u {
            0x80 => Some(Self::Des),
            0x88 => Some(Self::Aes),
            0xB0 => Some(Self::EccPublic),
            0xB1 => Some(Self::EccPrivate),
            0xF0 => Some(Self::EccKeyParameters),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_name(name: &[u8]) -> Option<Self> {
        let name = trim_ascii(name);
        match name.len() {
            3 if eq_ignore_ascii_case(name, b"des") => Some(Self::Des),
            3 if eq_ignore_ascii_case(name, b"aes") => Some(Self::Aes),
            10 if eq_ignore_ascii_case(name, b"ecc_public") => Some(Self::EccPublic),
            11 if eq_ignore_ascii_case(name, b"ecc_private") => Some(Self::EccPrivate),
            18 if eq_ignore_ascii_case(name, b"ecc_key_parameters") => {
                Some(Self::EccKeyParameters)
            }
            _ => None,
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Des => "DES",
            Self::Aes => "AES",
            Self::EccPublic => "ECC_PUBLIC",
            Self::EccPrivate => "ECC_PRIVATE",
            Self::EccKeyParameters => "ECC_KEY_PARAMETERS",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for KeyType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.as_bytes()).ok_or_else(|| ParseError {
            kind: "key type",
            value: s.to_owned(),
        })
    }
}

/**
    Role of the certificate holder, carried as tag C8 in discretionary data.
*/
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CertificateType {
    SmDp = 1,
    SmSr = 2,
}

impl CertificateType {
    pub const fn from_u8(u: u8) -> Option<Self> {
        match u {
            1 => Some(Self::SmDp),
            2 => Some(Self::SmSr),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_name(name: &[u8]) -> Option<Self> {
        let name = trim_ascii(name);
        match name.len() {
            4 if eq_ignore_ascii_case(name, b"smdp") => Some(Self::SmDp),
            4 if eq_ignore_ascii_case(name, b"smsr") => Some(Self::SmSr),
            5 if eq_ignore_ascii_case(name, b"sm-dp") => Some(Self::SmDp),
            5 if eq_ignore_ascii_case(name, b"sm-sr") => Some(Self::SmSr),
            _ => None,
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::SmDp => "SM-DP",
            Self::SmSr => "SM-SR",
        }
    }

    /**
        Discretionary data payload used when no explicit one is supplied.
    */
    pub const fn default_discretionary_data(self) -> [u8; 3] {
        [0xC8, 0x01, self.to_u8()]
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for CertificateType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.as_bytes()).ok_or_else(|| ParseError {
            kind: "certificate type",
            value: s.to_owned(),
        })
    }
}

/**
    Key usage qualifier (CRT tag 95): how many keys the derived material feeds.
*/
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyQualifier {
    /// One key (SCP81 PSK / token key).
    SingleKey = 0x5C,
    /// Three keys (SCP03 S-ENC, S-MAC, DEK).
    ThreeKeys = 0x10,
}

impl KeyQualifier {
    pub const fn from_u8(u: u8) -> Option<Self> {
        match u {
            0x5C => Some(Self::SingleKey),
            0x10 => Some(Self::ThreeKeys),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_key_count(n: usize) -> Option<Self> {
        match n {
            1 => Some(Self::SingleKey),
            3 => Some(Self::ThreeKeys),
            _ => None,
        }
    }

    pub const fn key_count(self) -> usize {
        match self {
            Self::SingleKey => 1,
            Self::ThreeKeys => 3,
        }
    }
}

impl fmt::Display for KeyQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X} ({} key)", self.to_u8(), self.key_count())
    }
}

/**
    Scenario #3 option bits (CRT tag 90, second byte).
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScenarioFlags(pub u8);

impl ScenarioFlags {
    pub const NONE: Self = Self(0x00);
    pub const DELETE_EXISTING_KEYS: Self = Self(0x01);
    pub const INCLUDE_DERIVATION_RANDOM: Self = Self(0x02);
    /// Set automatically when the CRT carries SDIN and host id.
    pub const SDIN_INCLUDED: Self = Self(0x04);
    pub const CERTIFICATE_VERIFICATION_PRECEDES: Self = Self(0x08);

    /// Scenario identifier emitted before the option bits.
    pub const SCENARIO_ID: u8 = 0x03;

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for ScenarioFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

impl fmt::Display for ScenarioFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/**
    Certificate key usage (tag 95), two bytes.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyUsage(pub u16);

impl KeyUsage {
    pub const KEY_AGREEMENT: Self = Self(0x0080);

    pub const fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}
