/*!
    Cryptographic primitives for ECKA key establishment.

    Asymmetric:
    - ECKA-DH / ECKA-EG shared secret: x-coordinate of d·Q, no cofactor
    - ECDSA with the hash chosen from the curve's field size

    Symmetric:
    - X9.63 KDF over SHA-256 (BSI TR-03111)
    - AES-CMAC with ISO/IEC 9797-1 method 2 padding for receipts
*/

mod cmac;
mod ecdh;
mod kdf;
mod signing;

pub use self::cmac::{AES_BLOCK_LEN, aes_cmac, aes_cmac_verify};
pub use self::ecdh::derive_shared_secret;
pub use self::kdf::x963_kdf;
pub use self::signing::{HashAlgorithm, SignatureEncoding, sign, verify};
