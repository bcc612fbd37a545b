use anyhow::{Context, Result};
use clap::Args;
use rsp_core::{Tag, TlvError, decode_all, utils::encode_hex_upper};

use super::hex_arg;

/**
    Dump a BER-TLV structure. Constructed elements are expanded when
    their value parses as TLV.
*/
#[derive(Args)]
pub struct TlvCommand {
    /// Hex-encoded TLV data.
    pub hex: String,
}

impl TlvCommand {
    pub fn run(self) -> Result<()> {
        let data = hex_arg(&self.hex, "input")?;
        for line in render(&data, 0).context("failed to decode TLV")? {
            println!("{line}");
        }
        Ok(())
    }
}

fn is_constructed(tag: Tag) -> bool {
    let first = match tag {
        Tag::Single(b) => b,
        Tag::Double([b, _]) => b,
    };
    first & 0x20 != 0
}

fn render(data: &[u8], depth: usize) -> Result<Vec<String>, TlvError> {
    let indent = "  ".repeat(depth);
    let mut lines = Vec::new();
    for tlv in decode_all(data) {
        let tlv = tlv?;
        let children = is_constructed(tlv.tag)
            .then(|| render(tlv.value, depth + 1).ok())
            .flatten();
        match children {
            Some(children) => {
                lines.push(format!("{indent}{} ({} bytes)", tlv.tag, tlv.value.len()));
                lines.extend(children);
            }
            None => lines.push(format!("{indent}{} {}", tlv.tag, encode_hex_upper(tlv.value))),
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn nested_templates_are_expanded() {
        let lines = render(&hex!("7F21 08 93 01 05 73 03 C8 01 01 5F37 02 AA BB"), 0).unwrap();
        assert_eq!(
            lines,
            [
                "7F21 (8 bytes)",
                "  93 05",
                "  73 (3 bytes)",
                "    C8 01",
                "5F37 AABB",
            ]
        );
    }

    #[test]
    fn constructed_tag_with_opaque_value() {
        let lines = render(&hex!("73 02 C8 05"), 0).unwrap();
        assert_eq!(lines, ["73 C805"]);
    }

    #[test]
    fn truncated_input_fails() {
        assert!(render(&hex!("93 05 01"), 0).is_err());
    }
}
