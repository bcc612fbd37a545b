use zeroize::Zeroizing;

use crate::error::{EckaError, EckaResult};
use crate::keys::{PrivateKey, PublicKey};

/**
    ECKA shared secret ZAB: the big-endian x-coordinate of `d·Q`, padded
    to the field size. Both keys must be on the same curve.
*/
pub fn derive_shared_secret(
    private: &PrivateKey,
    public: &PublicKey,
) -> EckaResult<Zeroizing<Vec<u8>>> {
    let secret = match (private, public) {
        (PrivateKey::P256(d), PublicKey::P256(q)) => {
            p256::ecdh::diffie_hellman(d.to_nonzero_scalar(), q.as_affine())
                .raw_secret_bytes()
                .to_vec()
        }
        (PrivateKey::P384(d), PublicKey::P384(q)) => {
            p384::ecdh::diffie_hellman(d.to_nonzero_scalar(), q.as_affine())
                .raw_secret_bytes()
                .to_vec()
        }
        (PrivateKey::P521(d), PublicKey::P521(q)) => {
            p521::ecdh::diffie_hellman(d.to_nonzero_scalar(), q.as_affine())
                .raw_secret_bytes()
                .to_vec()
        }
        _ => return Err(EckaError::CurveMismatch(private.curve(), public.curve())),
    };
    Ok(Zeroizing::new(secret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::Curve;
    use crate::keys::{KeyPair, decode_point, decode_private_scalar};
    use hex_literal::hex;

    #[test]
    fn p256_known_answer() {
        let d_a = decode_private_scalar(
            &hex!("7d7dc5f71eb29ddaf80d6214632eeae03d9058af1fb6d22ed80badb62bc1a534"),
            Curve::P256,
        )
        .unwrap();
        let q_b = decode_point(
            &hex!(
                "04119f2f047902782ab0c9e27a54aff5eb9b964829ca99c06b02ddba95b0a3f6d0"
                "8f52b726664cac366fc98ac7a012b2682cbd962e5acb544671d41b9445704d1d"
            ),
            Curve::P256,
        )
        .unwrap();
        assert_eq!(
            derive_shared_secret(&d_a, &q_b).unwrap().as_slice(),
            hex!("69854de86f85d63854b189cd4f7a556c668977ed93277edc449e9f7655b28175")
        );
    }

    #[test]
    fn both_sides_agree() {
        for curve in [Curve::P256, Curve::P384, Curve::P521] {
            let a = KeyPair::generate(curve).unwrap();
            let b = KeyPair::generate(curve).unwrap();
            let zab = derive_shared_secret(&a.private, &b.public).unwrap();
            assert_eq!(zab.len(), curve.coordinate_len());
            assert_eq!(zab, derive_shared_secret(&b.private, &a.public).unwrap());
        }
    }

    #[test]
    fn curve_mismatch() {
        let a = KeyPair::generate(Curve::P256).unwrap();
        let b = KeyPair::generate(Curve::P384).unwrap();
        assert_eq!(
            derive_shared_secret(&a.private, &b.public).unwrap_err(),
            EckaError::CurveMismatch(Curve::P256, Curve::P384)
        );
    }
}
