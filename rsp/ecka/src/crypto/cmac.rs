use aes::{Aes128, Aes192, Aes256};
use cmac::{Cmac, Mac};

use crate::error::{EckaError, EckaResult};

pub const AES_BLOCK_LEN: usize = 16;

enum AesCmac {
    Aes128(Cmac<Aes128>),
    Aes192(Cmac<Aes192>),
    Aes256(Cmac<Aes256>),
}

impl AesCmac {
    fn new(key: &[u8]) -> EckaResult<Self> {
        let invalid = |_| EckaError::InvalidReceiptKey(key.len());
        match key.len() {
            16 => <Cmac<Aes128> as Mac>::new_from_slice(key)
                .map(Self::Aes128)
                .map_err(invalid),
            24 => <Cmac<Aes192> as Mac>::new_from_slice(key)
                .map(Self::Aes192)
                .map_err(invalid),
            32 => <Cmac<Aes256> as Mac>::new_from_slice(key)
                .map(Self::Aes256)
                .map_err(invalid),
            other => Err(EckaError::InvalidReceiptKey(other)),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Aes128(mac) => mac.update(data),
            Self::Aes192(mac) => mac.update(data),
            Self::Aes256(mac) => mac.update(data),
        }
    }

    fn finalize(self) -> [u8; AES_BLOCK_LEN] {
        let mut out = [0u8; AES_BLOCK_LEN];
        match self {
            Self::Aes128(mac) => out.copy_from_slice(&mac.finalize().into_bytes()),
            Self::Aes192(mac) => out.copy_from_slice(&mac.finalize().into_bytes()),
            Self::Aes256(mac) => out.copy_from_slice(&mac.finalize().into_bytes()),
        }
        out
    }

    fn verify(self, tag: &[u8]) -> bool {
        match self {
            Self::Aes128(mac) => mac.verify_slice(tag).is_ok(),
            Self::Aes192(mac) => mac.verify_slice(tag).is_ok(),
            Self::Aes256(mac) => mac.verify_slice(tag).is_ok(),
        }
    }
}

/**
    AES-CMAC (NIST SP 800-38B) with a 128, 192 or 256-bit key.
*/
pub fn aes_cmac(key: &[u8], data: &[u8]) -> EckaResult<[u8; AES_BLOCK_LEN]> {
    let mut mac = AesCmac::new(key)?;
    mac.update(data);
    Ok(mac.finalize())
}

/**
    Constant-time comparison of `tag` against the CMAC of `data`.
*/
pub fn aes_cmac_verify(key: &[u8], data: &[u8], tag: &[u8]) -> EckaResult<bool> {
    let mut mac = AesCmac::new(key)?;
    mac.update(data);
    Ok(mac.verify(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // SP 800-38B, appendix D.1
    const KEY: [u8; 16] = hex!("2b7e151628aed2a6abf7158809cf4f3c");

    #[test]
    fn sp800_38b_vectors() {
        assert_eq!(
            aes_cmac(&KEY, &[]).unwrap(),
            hex!("bb1d6929e95937287fa37d129b756746")
        );
        assert_eq!(
            aes_cmac(&KEY, &hex!("6bc1bee22e409f96e93d7e117393172a")).unwrap(),
            hex!("070a16b46b4d4144f79bdd9dd04a287c")
        );
    }

    #[test]
    fn verify_tag() {
        let data = hex!("6bc1bee22e409f96e93d7e117393172a");
        let tag = hex!("070a16b46b4d4144f79bdd9dd04a287c");
        assert!(aes_cmac_verify(&KEY, &data, &tag).unwrap());
        assert!(!aes_cmac_verify(&KEY, &data, &tag[..15]).unwrap());
        assert!(!aes_cmac_verify(&KEY, &data[..15], &tag).unwrap());
    }

    #[test]
    fn key_sizes() {
        assert!(aes_cmac(&[0; 24], b"x").is_ok());
        assert!(aes_cmac(&[0; 32], b"x").is_ok());
        assert_eq!(
            aes_cmac(&[0; 20], b"x").unwrap_err(),
            EckaError::InvalidReceiptKey(20)
        );
    }
}
