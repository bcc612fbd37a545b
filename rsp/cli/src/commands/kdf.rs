use anyhow::{Context, Result};
use clap::Args;
use rsp_core::utils::encode_hex_upper;
use rsp_ecka::{DEFAULT_KEY_DATA_BITS, crypto::x963_kdf};

use super::hex_arg;

/**
    Run the X9.63 key derivation function (SHA-256).
*/
#[derive(Args)]
pub struct KdfCommand {
    /// Shared secret as hex.
    #[arg(long)]
    pub zab: String,

    /// Shared info as hex.
    #[arg(long)]
    pub shared_info: Option<String>,

    /// Output length in bits.
    #[arg(long, default_value_t = DEFAULT_KEY_DATA_BITS)]
    pub bits: usize,
}

impl KdfCommand {
    pub fn run(self) -> Result<()> {
        let zab = hex_arg(&self.zab, "shared secret")?;
        let shared_info = self
            .shared_info
            .as_deref()
            .map(|s| hex_arg(s, "shared info"))
            .transpose()?;

        let key_data =
            x963_kdf(&zab, shared_info.as_deref(), self.bits).context("key derivation failed")?;
        println!("{}", encode_hex_upper(&key_data));
        Ok(())
    }
}
