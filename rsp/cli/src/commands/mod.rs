mod cert;
mod curves;
mod kdf;
mod receipt;
mod tlv;

use std::path::Path;

use anyhow::{Context, Result};
use rsp_ecka::Config;
use tracing::debug;

pub use self::cert::CertCommand;
pub use self::curves::CurvesCommand;
pub use self::kdf::KdfCommand;
pub use self::receipt::ReceiptCommand;
pub use self::tlv::TlvCommand;

fn hex_arg(value: &str, what: &str) -> Result<Vec<u8>> {
    rsp_core::utils::decode_hex(value).with_context(|| format!("{what} is not valid hex"))
}

fn load_config(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "loading configuration");
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Config::from_json(&json).with_context(|| format!("invalid configuration {}", path.display()))
}

/**
    Parse a byte given as decimal or `0x`-prefixed hex.
*/
fn parse_byte(value: &str) -> Result<u8, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("{value}: {e}"))
}
