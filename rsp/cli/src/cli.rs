use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{CertCommand, CurvesCommand, KdfCommand, ReceiptCommand, TlvCommand};

/**
    Inspection tool for SGP.02 key establishment data.
*/
#[derive(Parser)]
#[command(name = "rsp-cli")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dump a BER-TLV structure.
    Tlv(TlvCommand),
    /// Decode a certificate and optionally check it against a CI key.
    Cert(CertCommand),
    /// Run the X9.63 key derivation function.
    Kdf(KdfCommand),
    /// Compute a key establishment receipt.
    Receipt(ReceiptCommand),
    /// List the curve parameter references.
    Curves(CurvesCommand),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Tlv(cmd) => cmd.run(),
            Command::Cert(cmd) => cmd.run(),
            Command::Kdf(cmd) => cmd.run(),
            Command::Receipt(cmd) => cmd.run(),
            Command::Curves(cmd) => cmd.run(),
        }
    }
}
