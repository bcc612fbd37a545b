use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rsp_ecka::CurveRegistry;

use super::load_config;

/**
    List the curve parameter references.
*/
#[derive(Args)]
pub struct CurvesCommand {
    /// List the curves enabled by this configuration instead of all known curves.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl CurvesCommand {
    pub fn run(self) -> Result<()> {
        let registry = match &self.config {
            Some(path) => load_config(path)?.registry,
            None => CurveRegistry::standard(),
        };

        println!("Ref  Curve              Bits  Hash     Arithmetic");
        for curve in registry.curves() {
            println!(
                "{:02X}   {:<18} {:>4}  {:<7}  {}",
                curve.to_u8(),
                curve.to_name(),
                curve.field_bits(),
                curve.signature_hash().to_name(),
                if curve.is_supported() { "yes" } else { "no" },
            );
        }
        Ok(())
    }
}
