use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use rsp_core::utils::encode_hex_upper;
use rsp_format::CertificateRecord;

use super::{hex_arg, load_config};

/**
    Decode a certificate and optionally check it against a CI key.
*/
#[derive(Args)]
pub struct CertCommand {
    /// Hex-encoded certificate (7F21).
    pub hex: String,

    /// JSON configuration holding the CI public key. Enables the trust check.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Date to check validity against (YYYY-MM-DD). Defaults to today.
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

impl CertCommand {
    pub fn run(self) -> Result<()> {
        let data = hex_arg(&self.hex, "certificate")?;
        let record = CertificateRecord::from_bytes(&data).context("failed to decode certificate")?;

        println!("Serial:          {}", encode_hex_upper(&record.serial));
        println!("CA Key ID:       {}", encode_hex_upper(&record.ca_key_id));
        println!("Subject Key ID:  {}", encode_hex_upper(&record.subject_key_id));
        println!("Key Usage:       {}", record.key_usage);
        if let Some(date) = &record.effective_date {
            println!("Effective:       {date}");
        }
        println!("Expires:         {}", record.expiration_date);
        if let Some(image_number) = &record.ecasd_image_number {
            println!("Image Number:    {}", encode_hex_upper(image_number));
        }
        if let Some(cert_type) = record.certificate_type() {
            println!("Type:            {cert_type}");
        }
        println!("Key Param Ref:   {:02X}", record.public_key.key_param_ref);
        println!("Public Key:      {}", encode_hex_upper(&record.public_key.point));
        println!("Signature:       {} bytes", record.signature.len());

        let Some(path) = &self.config else {
            return Ok(());
        };
        let config = load_config(path)?;
        let now = self.date.unwrap_or_else(|| Local::now().date_naive());
        let trusted = config
            .trust
            .verify(&record, &config.registry, now)
            .context("certificate is not trusted")?;

        println!();
        println!("Trusted on {now} ({} key)", trusted.public_key().curve());
        Ok(())
    }
}
