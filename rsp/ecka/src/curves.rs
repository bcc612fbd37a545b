/*!
    Named-curve registry keyed by GlobalPlatform key parameter reference.

    | ref  | curve             | field bits | ECDSA hash |
    |------|-------------------|------------|------------|
    | 0x00 | P-256             | 256        | SHA-256    |
    | 0x01 | P-384             | 384        | SHA-384    |
    | 0x02 | P-521             | 521        | SHA-512    |
    | 0x03 | brainpoolP256r1   | 256        | SHA-256    |
    | 0x04 | brainpoolP256t1   | 256        | SHA-256    |
    | 0x05 | brainpoolP384r1   | 384        | SHA-384    |
    | 0x06 | brainpoolP384t1   | 384        | SHA-384    |
    | 0x07 | brainpoolP512r1   | 512        | SHA-512    |
    | 0x08 | brainpoolP512t1   | 512        | SHA-512    |
    | 0x40 | FRP256v1 (ANSSI)  | 256        | SHA-256    |

    Only the NIST curves have an arithmetic backend. The others can be looked
    up, reverse-resolved and hash-selected, but key operations on them fail
    with `UnsupportedCurve`.
*/

use core::fmt;
use core::str::FromStr;

use hex_literal::hex;

use rsp_core::utils::unsigned_be;
use rsp_core::{ParseError, eq_ignore_ascii_case, trim_ascii};

use crate::crypto::HashAlgorithm;
use crate::error::{EckaError, EckaResult};
use crate::keys::PublicKey;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Curve {
    P256 = 0x00,
    P384 = 0x01,
    P521 = 0x02,
    BrainpoolP256r1 = 0x03,
    BrainpoolP256t1 = 0x04,
    BrainpoolP384r1 = 0x05,
    BrainpoolP384t1 = 0x06,
    BrainpoolP512r1 = 0x07,
    BrainpoolP512t1 = 0x08,
    FrP256v1 = 0x40,
}

impl Curve {
    pub const ALL: [Self; 10] = [
        Self::P256,
        Self::P384,
        Self::P521,
        Self::BrainpoolP256r1,
        Self::BrainpoolP256t1,
        Self::BrainpoolP384r1,
        Self::BrainpoolP384t1,
        Self::BrainpoolP512r1,
        Self::BrainpoolP512t1,
        Self::FrP256v1,
    ];

    pub const fn from_u8(u: u8) -> Option<Self> {
        match u {
            0x00 => Some(Self::P256),
            0x01 => Some(Self::P384),
            0x02 => Some(Self::P521),
            0x03 => Some(Self::BrainpoolP256r1),
            0x04 => Some(Self::BrainpoolP256t1),
            0x05 => Some(Self::BrainpoolP384r1),
            0x06 => Some(Self::BrainpoolP384t1),
            0x07 => Some(Self::BrainpoolP512r1),
            0x08 => Some(Self::BrainpoolP512t1),
            0x40 => Some(Self::FrP256v1),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_name(name: &[u8]) -> Option<Self> {
        let name = trim_ascii(name);
        match name.len() {
            5 if eq_ignore_ascii_case(name, b"p-256") => Some(Self::P256),
            5 if eq_ignore_ascii_case(name, b"p-384") => Some(Self::P384),
            5 if eq_ignore_ascii_case(name, b"p-521") => Some(Self::P521),
            8 if eq_ignore_ascii_case(name, b"frp256v1") => Some(Self::FrP256v1),
            15 if eq_ignore_ascii_case(name, b"brainpoolp256r1") => Some(Self::BrainpoolP256r1),
            15 if eq_ignore_ascii_case(name, b"brainpoolp256t1") => Some(Self::BrainpoolP256t1),
            15 if eq_ignore_ascii_case(name, b"brainpoolp384r1") => Some(Self::BrainpoolP384r1),
            15 if eq_ignore_ascii_case(name, b"brainpoolp384t1") => Some(Self::BrainpoolP384t1),
            15 if eq_ignore_ascii_case(name, b"brainpoolp512r1") => Some(Self::BrainpoolP512r1),
            15 if eq_ignore_ascii_case(name, b"brainpoolp512t1") => Some(Self::BrainpoolP512t1),
            _ => None,
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
            Self::BrainpoolP256r1 => "brainpoolP256r1",
            Self::BrainpoolP256t1 => "brainpoolP256t1",
            Self::BrainpoolP384r1 => "brainpoolP384r1",
            Self::BrainpoolP384t1 => "brainpoolP384t1",
            Self::BrainpoolP512r1 => "brainpoolP512r1",
            Self::BrainpoolP512t1 => "brainpoolP512t1",
            Self::FrP256v1 => "FRP256v1",
        }
    }

    pub const fn params(self) -> &'static CurveParams {
        match self {
            Self::P256 => &P256,
            Self::P384 => &P384,
            Self::P521 => &P521,
            Self::BrainpoolP256r1 => &BRAINPOOL_P256R1,
            Self::BrainpoolP256t1 => &BRAINPOOL_P256T1,
            Self::BrainpoolP384r1 => &BRAINPOOL_P384R1,
            Self::BrainpoolP384t1 => &BRAINPOOL_P384T1,
            Self::BrainpoolP512r1 => &BRAINPOOL_P512R1,
            Self::BrainpoolP512t1 => &BRAINPOOL_P512T1,
            Self::FrP256v1 => &FRP256V1,
        }
    }

    pub const fn field_bits(self) -> usize {
        self.params().field_bits
    }

    /// Bytes per coordinate or scalar: `ceil(field_bits / 8)`.
    pub const fn coordinate_len(self) -> usize {
        self.field_bits().div_ceil(8)
    }

    /// Length of an X9.62 uncompressed point.
    pub const fn point_len(self) -> usize {
        1 + 2 * self.coordinate_len()
    }

    pub const fn signature_hash(self) -> HashAlgorithm {
        HashAlgorithm::for_field_bits(self.field_bits())
    }

    pub const fn is_supported(self) -> bool {
        matches!(self, Self::P256 | Self::P384 | Self::P521)
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for Curve {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.as_bytes()).ok_or_else(|| ParseError {
            kind: "curve",
            value: s.to_owned(),
        })
    }
}

/**
    Explicit short-Weierstrass domain parameters, big-endian.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveParams {
    pub field_bits: usize,
    pub p: &'static [u8],
    pub a: &'static [u8],
    pub b: &'static [u8],
    /// Generator, X9.62 uncompressed.
    pub g: &'static [u8],
    pub n: &'static [u8],
    pub h: u8,
}

impl CurveParams {
    /**
        Same curve: order, cofactor, equation and generator agree. Integers
        compare by value, ignoring leading zero bytes.
    */
    pub fn same_curve(&self, other: &CurveParams) -> bool {
        unsigned_be(self.n) == unsigned_be(other.n)
            && self.h == other.h
            && unsigned_be(self.p) == unsigned_be(other.p)
            && unsigned_be(self.a) == unsigned_be(other.a)
            && unsigned_be(self.b) == unsigned_be(other.b)
            && self.g == other.g
    }
}

/**
    The set of curves this deployment accepts, keyed by reference.

    Built once and shared by reference. Construction rejects duplicate
    entries so that reverse lookup from parameters has at most one answer.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveRegistry {
    curves: Vec<Curve>,
}

impl CurveRegistry {
    pub fn new(curves: impl IntoIterator<Item = Curve>) -> EckaResult<Self> {
        let mut registered: Vec<Curve> = Vec::new();
        for curve in curves {
            if let Some(existing) = registered
                .iter()
                .find(|c| c.params().same_curve(curve.params()))
            {
                return Err(EckaError::InvalidConfig(format!(
                    "curve {curve} duplicates registered curve {existing}"
                )));
            }
            registered.push(curve);
        }
        Ok(Self { curves: registered })
    }

    /// Every curve in the reference table.
    pub fn standard() -> Self {
        Self {
            curves: Curve::ALL.to_vec(),
        }
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn lookup(&self, key_param_ref: u8) -> EckaResult<Curve> {
        Curve::from_u8(key_param_ref)
            .filter(|c| self.curves.contains(c))
            .ok_or(EckaError::UnknownCurveReference(key_param_ref))
    }

    /**
        Reverse lookup from explicit parameters. `None` when no registered
        curve matches.
    */
    pub fn resolve_params(&self, params: &CurveParams) -> Option<u8> {
        self.curves
            .iter()
            .find(|c| c.params().same_curve(params))
            .map(|c| c.to_u8())
    }

    pub fn resolve_key(&self, key: &PublicKey) -> Option<u8> {
        self.resolve_params(key.curve().params())
    }

    /**
        Reverse lookup for callers that must emit a reference.
    */
    pub fn reference_for(&self, key: &PublicKey) -> EckaResult<u8> {
        self.resolve_key(key).ok_or(EckaError::UnregisteredCurve)
    }
}

impl Default for CurveRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// NIST P-256 (secp256r1)
const P256: CurveParams = CurveParams {
    field_bits: 256,
    p: &hex!("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF"),
    a: &hex!("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC"),
    b: &hex!("5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B"),
    g: &hex!(
        "046B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C2"
        "964FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51"
        "F5"
    ),
    n: &hex!("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551"),
    h: 1,
};

/// NIST P-384 (secp384r1)
const P384: CurveParams = CurveParams {
    field_bits: 384,
    p: &hex!(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFE"
        "FFFFFFFF0000000000000000FFFFFFFF"
    ),
    a: &hex!(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFE"
        "FFFFFFFF0000000000000000FFFFFFFC"
    ),
    b: &hex!(
        "B3312FA7E23EE7E4988E056BE3F82D19181D9C6EFE8141120314088F5013875A"
        "C656398D8A2ED19D2A85C8EDD3EC2AEF"
    ),
    g: &hex!(
        "04AA87CA22BE8B05378EB1C71EF320AD746E1D3B628BA79B9859F741E082542A"
        "385502F25DBF55296C3A545E3872760AB73617DE4A96262C6F5D9E98BF9292DC"
        "29F8F41DBD289A147CE9DA3113B5F0B8C00A60B1CE1D7E819D7A431D7C90EA0E"
        "5F"
    ),
    n: &hex!(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC7634D81F4372DDF"
        "581A0DB248B0A77AECEC196ACCC52973"
    ),
    h: 1,
};

/// NIST P-521 (secp521r1)
const P521: CurveParams = CurveParams {
    field_bits: 521,
    p: &hex!(
        "01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF"
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF"
        "FFFF"
    ),
    a: &hex!(
        "01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF"
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF"
        "FFFC"
    ),
    b: &hex!(
        "0051953EB9618E1C9A1F929A21A0B68540EEA2DA725B99B315F3B8B489918EF1"
        "09E156193951EC7E937B1652C0BD3BB1BF073573DF883D2C34F1EF451FD46B50"
        "3F00"
    ),
    g: &hex!(
        "0400C6858E06B70404E9CD9E3ECB662395B4429C648139053FB521F828AF606B"
        "4D3DBAA14B5E77EFE75928FE1DC127A2FFA8DE3348B3C1856A429BF97E7E31C2"
        "E5BD66011839296A789A3BC0045C8A5FB42C7D1BD998F54449579B446817AFBD"
        "17273E662C97EE72995EF42640C550B9013FAD0761353C7086A272C24088BE94"
        "769FD16650"
    ),
    n: &hex!(
        "01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF"
        "FFFA51868783BF2F966B7FCC0148F709A5D03BB5C9B8899C47AEBB6FB71E9138"
        "6409"
    ),
    h: 1,
};

/// brainpoolP256r1
const BRAINPOOL_P256R1: CurveParams = CurveParams {
    field_bits: 256,
    p: &hex!("A9FB57DBA1EEA9BC3E660A909D838D726E3BF623D52620282013481D1F6E5377"),
    a: &hex!("7D5A0975FC2C3057EEF67530417AFFE7FB8055C126DC5C6CE94A4B44F330B5D9"),
    b: &hex!("26DC5C6CE94A4B44F330B5D9BBD77CBF958416295CF7E1CE6BCCDC18FF8C07B6"),
    g: &hex!(
        "048BD2AEB9CB7E57CB2C4B482FFC81B7AFB9DE27E1E3BD23C23A4453BD9ACE32"
        "62547EF835C3DAC4FD97F8461A14611DC9C27745132DED8E545C1D54C72F0469"
        "97"
    ),
    n: &hex!("A9FB57DBA1EEA9BC3E660A909D838D718C397AA3B561A6F7901E0E82974856A7"),
    h: 1,
};

/// brainpoolP256t1
const BRAINPOOL_P256T1: CurveParams = CurveParams {
    field_bits: 256,
    p: &hex!("A9FB57DBA1EEA9BC3E660A909D838D726E3BF623D52620282013481D1F6E5377"),
    a: &hex!("A9FB57DBA1EEA9BC3E660A909D838D726E3BF623D52620282013481D1F6E5374"),
    b: &hex!("662C61C430D84EA4FE66A7733D0B76B7BF93EBC4AF2F49256AE58101FEE92B04"),
    g: &hex!(
        "04A3E8EB3CC1CFE7B7732213B23A656149AFA142C47AAFBC2B79A191562E1305"
        "F42D996C823439C56D7F7B22E14644417E69BCB6DE39D027001DABE8F35B25C9"
        "BE"
    ),
    n: &hex!("A9FB57DBA1EEA9BC3E660A909D838D718C397AA3B561A6F7901E0E82974856A7"),
    h: 1,
};

/// brainpoolP384r1
const BRAINPOOL_P384R1: CurveParams = CurveParams {
    field_bits: 384,
    p: &hex!(
        "8CB91E82A3386D280F5D6F7E50E641DF152F7109ED5456B412B1DA197FB71123"
        "ACD3A729901D1A71874700133107EC53"
    ),
    a: &hex!(
        "7BC382C63D8C150C3C72080ACE05AFA0C2BEA28E4FB22787139165EFBA91F90F"
        "8AA5814A503AD4EB04A8C7DD22CE2826"
    ),
    b: &hex!(
        "04A8C7DD22CE28268B39B55416F0447C2FB77DE107DCD2A62E880EA53EEB62D5"
        "7CB4390295DBC9943AB78696FA504C11"
    ),
    g: &hex!(
        "041D1C64F068CF45FFA2A63A81B7C13F6B8847A3E77EF14FE3DB7FCAFE0CBD10"
        "E8E826E03436D646AAEF87B2E247D4AF1E8ABE1D7520F9C2A45CB1EB8E95CFD5"
        "5262B70B29FEEC5864E19C054FF99129280E4646217791811142820341263C53"
        "15"
    ),
    n: &hex!(
        "8CB91E82A3386D280F5D6F7E50E641DF152F7109ED5456B31F166E6CAC0425A7"
        "CF3AB6AF6B7FC3103B883202E9046565"
    ),
    h: 1,
};

/// brainpoolP384t1
const BRAINPOOL_P384T1: CurveParams = CurveParams {
    field_bits: 384,
    p: &hex!(
        "8CB91E82A3386D280F5D6F7E50E641DF152F7109ED5456B412B1DA197FB71123"
        "ACD3A729901D1A71874700133107EC53"
    ),
    a: &hex!(
        "8CB91E82A3386D280F5D6F7E50E641DF152F7109ED5456B412B1DA197FB71123"
        "ACD3A729901D1A71874700133107EC50"
    ),
    b: &hex!(
        "7F519EADA7BDA81BD826DBA647910F8C4B9346ED8CCDC64E4B1ABD11756DCE1D"
        "2074AA263B88805CED70355A33B471EE"
    ),
    g: &hex!(
        "0418DE98B02DB9A306F2AFCD7235F72A819B80AB12EBD653172476FECD462AAB"
        "FFC4FF191B946A5F54D8D0AA2F418808CC25AB056962D30651A114AFD2755AD3"
        "36747F93475B7A1FCA3B88F2B6A208CCFE469408584DC2B2912675BF5B9E5829"
        "28"
    ),
    n: &hex!(
        "8CB91E82A3386D280F5D6F7E50E641DF152F7109ED5456B31F166E6CAC0425A7"
        "CF3AB6AF6B7FC3103B883202E9046565"
    ),
    h: 1,
};

/// brainpoolP512r1
const BRAINPOOL_P512R1: CurveParams = CurveParams {
    field_bits: 512,
    p: &hex!(
        "AADD9DB8DBE9C48B3FD4E6AE33C9FC07CB308DB3B3C9D20ED6639CCA70330871"
        "7D4D9B009BC66842AECDA12AE6A380E62881FF2F2D82C68528AA6056583A48F3"
    ),
    a: &hex!(
        "7830A3318B603B89E2327145AC234CC594CBDD8D3DF91610A83441CAEA9863BC"
        "2DED5D5AA8253AA10A2EF1C98B9AC8B57F1117A72BF2C7B9E7C1AC4D77FC94CA"
    ),
    b: &hex!(
        "3DF91610A83441CAEA9863BC2DED5D5AA8253AA10A2EF1C98B9AC8B57F1117A7"
        "2BF2C7B9E7C1AC4D77FC94CADC083E67984050B75EBAE5DD2809BD638016F723"
    ),
    g: &hex!(
        "0481AEE4BDD82ED9645A21322E9C4C6A9385ED9F70B5D916C1B43B62EEF4D009"
        "8EFF3B1F78E2D0D48D50D1687B93B97D5F7C6D5047406A5E688B352209BCB9F8"
        "227DDE385D566332ECC0EABFA9CF7822FDF209F70024A57B1AA000C55B881F81"
        "11B2DCDE494A5F485E5BCA4BD88A2763AED1CA2B2FA8F0540678CD1E0F3AD808"
        "92"
    ),
    n: &hex!(
        "AADD9DB8DBE9C48B3FD4E6AE33C9FC07CB308DB3B3C9D20ED6639CCA70330870"
        "553E5C414CA92619418661197FAC10471DB1D381085DDADDB58796829CA90069"
    ),
    h: 1,
};

/// brainpoolP512t1
const BRAINPOOL_P512T1: CurveParams = CurveParams {
    field_bits: 512,
    p: &hex!(
        "AADD9DB8DBE9C48B3FD4E6AE33C9FC07CB308DB3B3C9D20ED6639CCA70330871"
        "7D4D9B009BC66842AECDA12AE6A380E62881FF2F2D82C68528AA6056583A48F3"
    ),
    a: &hex!(
        "AADD9DB8DBE9C48B3FD4E6AE33C9FC07CB308DB3B3C9D20ED6639CCA70330871"
        "7D4D9B009BC66842AECDA12AE6A380E62881FF2F2D82C68528AA6056583A48F0"
    ),
    b: &hex!(
        "7CBBBCF9441CFAB76E1890E46884EAE321F70C0BCB4981527897504BEC3E36A6"
        "2BCDFA2304976540F6450085F2DAE145C22553B465763689180EA2571867423E"
    ),
    g: &hex!(
        "04640ECE5C12788717B9C1BA06CBC2A6FEBA85842458C56DDE9DB1758D39C031"
        "3D82BA51735CDB3EA499AA77A7D6943A64F7A3F25FE26F06B51BAA2696FA9035"
        "DA5B534BD595F5AF0FA2C892376C84ACE1BB4E3019B71634C01131159CAE03CE"
        "E9D9932184BEEF216BD71DF2DADF86A627306ECFF96DBB8BACE198B61E00F8B3"
        "32"
    ),
    n: &hex!(
        "AADD9DB8DBE9C48B3FD4E6AE33C9FC07CB308DB3B3C9D20ED6639CCA70330870"
        "553E5C414CA92619418661197FAC10471DB1D381085DDADDB58796829CA90069"
    ),
    h: 1,
};

/// ANSSI FRP256v1
const FRP256V1: CurveParams = CurveParams {
    field_bits: 256,
    p: &hex!("F1FD178C0B3AD58F10126DE8CE42435B3961ADBCABC8CA6DE8FCF353D86E9C03"),
    a: &hex!("F1FD178C0B3AD58F10126DE8CE42435B3961ADBCABC8CA6DE8FCF353D86E9C00"),
    b: &hex!("EE353FCA5428A9300D4ABA754A44C00FDFEC0C9AE4B1A1803075ED967B7BB73F"),
    g: &hex!(
        "04B6B3D4C356C139EB31183D4749D423958C27D2DCAF98B70164C97A2DD98F5C"
        "FF6142E0F7C8B204911F9271F0F3ECEF8C2701C307E8E4C9E183115A1554062C"
        "FB"
    ),
    n: &hex!("F1FD178C0B3AD58F10126DE8CE42435B53DC67E140D2BF941FFDD459C6D655E1"),
    h: 1,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_table() {
        for curve in Curve::ALL {
            assert_eq!(Curve::from_u8(curve.to_u8()), Some(curve));
            assert_eq!(curve.to_name().parse::<Curve>().unwrap(), curve);
        }
        assert_eq!(Curve::from_u8(0x09), None);
        assert_eq!(Curve::FrP256v1.to_u8(), 0x40);
    }

    #[test]
    fn parameter_sizes() {
        for curve in Curve::ALL {
            let params = curve.params();
            assert_eq!(params.g.len(), curve.point_len(), "{curve}");
            assert_eq!(params.g[0], 0x04);
            assert_eq!(params.p.len(), curve.coordinate_len(), "{curve}");
            assert_eq!(params.h, 1);
        }
        assert_eq!(Curve::P521.coordinate_len(), 66);
        assert_eq!(Curve::BrainpoolP512r1.point_len(), 129);
    }

    #[test]
    fn hash_selection_by_field_size() {
        assert_eq!(Curve::P256.signature_hash(), HashAlgorithm::Sha256);
        assert_eq!(Curve::FrP256v1.signature_hash(), HashAlgorithm::Sha256);
        assert_eq!(Curve::P384.signature_hash(), HashAlgorithm::Sha384);
        assert_eq!(Curve::BrainpoolP384t1.signature_hash(), HashAlgorithm::Sha384);
        assert_eq!(Curve::BrainpoolP512r1.signature_hash(), HashAlgorithm::Sha512);
        assert_eq!(Curve::P521.signature_hash(), HashAlgorithm::Sha512);
    }

    #[test]
    fn lookup_and_reverse_lookup() {
        let registry = CurveRegistry::standard();
        assert_eq!(registry.lookup(0x05).unwrap(), Curve::BrainpoolP384r1);
        assert_eq!(
            registry.lookup(0x09),
            Err(EckaError::UnknownCurveReference(0x09))
        );
        for curve in Curve::ALL {
            assert_eq!(registry.resolve_params(curve.params()), Some(curve.to_u8()));
        }
    }

    #[test]
    fn reverse_lookup_ignores_leading_zeros() {
        let mut n = vec![0x00];
        n.extend_from_slice(P256.n);
        let n: &'static [u8] = n.leak();
        let padded = CurveParams { n, ..P256 };
        assert_eq!(CurveRegistry::standard().resolve_params(&padded), Some(0x00));
    }

    #[test]
    fn restricted_registry() {
        let registry = CurveRegistry::new([Curve::P256, Curve::P384]).unwrap();
        assert!(registry.lookup(0x02).is_err());
        assert_eq!(registry.resolve_params(Curve::P521.params()), None);

        let err = CurveRegistry::new([Curve::P256, Curve::P256]).unwrap_err();
        assert!(matches!(err, EckaError::InvalidConfig(_)));
    }
}
