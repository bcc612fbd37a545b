use anyhow::{Context, Result};
use clap::Args;
use rsp_core::utils::encode_hex_upper;
use rsp_ecka::{ReceiptParams, compute_receipt};
use rsp_format::ScenarioFlags;

use super::{hex_arg, parse_byte};

/**
    Compute the receipt a card returns after key establishment.
*/
#[derive(Args)]
pub struct ReceiptCommand {
    /// Receipt key as hex (16, 24 or 32 bytes).
    #[arg(long)]
    pub key: String,

    /// Key identifier (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_byte)]
    pub key_id: u8,

    /// Key version number (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_byte)]
    pub key_version: u8,

    /// Scenario option bits.
    #[arg(long, value_parser = parse_byte, default_value = "0")]
    pub scenario: u8,

    /// Derivation random returned by the card, as hex.
    #[arg(long)]
    pub dr: Option<String>,

    /// Security domain image number, as hex.
    #[arg(long, requires = "host_id")]
    pub sdin: Option<String>,

    /// Host identifier, as hex.
    #[arg(long, requires = "sdin")]
    pub host_id: Option<String>,
}

impl ReceiptCommand {
    pub fn run(self) -> Result<()> {
        let key = hex_arg(&self.key, "receipt key")?;
        let dr = self.dr.as_deref().map(|s| hex_arg(s, "derivation random")).transpose()?;
        let sdin = self.sdin.as_deref().map(|s| hex_arg(s, "SDIN")).transpose()?;
        let host_id = self.host_id.as_deref().map(|s| hex_arg(s, "host id")).transpose()?;

        let params = ReceiptParams {
            derivation_random: dr.as_deref(),
            sdin: sdin.as_deref(),
            host_id: host_id.as_deref(),
            ..ReceiptParams::new(self.key_id, self.key_version, ScenarioFlags(self.scenario))
        };
        let input = params.mac_input().context("failed to build receipt input")?;
        let receipt = compute_receipt(&params, &key).context("failed to compute receipt")?;

        println!("MAC Input:  {}", encode_hex_upper(&input));
        println!("Receipt:    {}", encode_hex_upper(&receipt));
        Ok(())
    }
}
