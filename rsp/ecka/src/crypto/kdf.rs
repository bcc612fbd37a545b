/*!
    ANSI X9.63 key derivation over SHA-256:

    K = H(Z ‖ 00000001 ‖ SI) ‖ H(Z ‖ 00000002 ‖ SI) ‖ …

    truncated to the requested number of bits.
*/

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{EckaError, EckaResult};

pub fn x963_kdf(
    shared_secret: &[u8],
    shared_info: Option<&[u8]>,
    bits: usize,
) -> EckaResult<Zeroizing<Vec<u8>>> {
    if bits == 0 || bits % 8 != 0 {
        return Err(EckaError::InvalidKeyDataLength(bits));
    }
    let len = bits / 8;

    let mut out = Zeroizing::new(Vec::with_capacity(len.next_multiple_of(32)));
    let mut counter: u32 = 1;
    while out.len() < len {
        let mut hasher = Sha256::new();
        hasher.update(shared_secret);
        hasher.update(counter.to_be_bytes());
        if let Some(info) = shared_info {
            hasher.update(info);
        }
        out.extend_from_slice(&hasher.finalize());
        counter = counter
            .checked_add(1)
            .ok_or(EckaError::InvalidKeyDataLength(bits))?;
    }
    out.truncate(len);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn x963_known_answer() {
        let z = hex!("96c05619d56c328ab95fe84b18264b08725b85e33fd34f08");
        assert_eq!(
            x963_kdf(&z, None, 128).unwrap().as_slice(),
            hex!("443024c3dae66b95e6f5670601558f71")
        );
    }

    #[test]
    fn multiple_rounds() {
        let out = x963_kdf(&[0x01; 32], None, 512).unwrap();
        assert_eq!(
            out.as_slice(),
            hex!(
                "4791e3200a4f63b6473300594ca6212dce17c6231a3e642a86b30480a709eb7a"
                "de48feef65570607878bca4c6257b0c0c86d78e27271f98e6dc3a9140805c8e0"
            )
        );
        let short = x963_kdf(&[0x01; 32], None, 136).unwrap();
        assert_eq!(short.as_slice(), &out[..17]);
    }

    #[test]
    fn with_shared_info() {
        let z = hex!("69854de86f85d63854b189cd4f7a556c668977ed93277edc449e9f7655b28175");
        let info = hex!("5c88100102030405060708");
        assert_eq!(
            x963_kdf(&z, Some(&info), 256).unwrap().as_slice(),
            hex!("70547205abe5fc9814270ea367ba97bef2f201e553b2d7cfb0f823fb1949856b")
        );
    }

    #[test]
    fn rejects_bad_lengths() {
        assert_eq!(
            x963_kdf(&[0; 32], None, 0).unwrap_err(),
            EckaError::InvalidKeyDataLength(0)
        );
        assert_eq!(
            x963_kdf(&[0; 32], None, 100).unwrap_err(),
            EckaError::InvalidKeyDataLength(100)
        );
    }
}
