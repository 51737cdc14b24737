//! Hexdump of emulated RAM.
//!
//! # Output Format
//!
//! ```text
//! 0x80000000: 47 4B 59 45 30 31 00 00  00 00 00 00 00 00 00 00  |GKYE01..........|
//! ```

use anyhow::{Context, Result, anyhow};
use karlink_core::{DolphinBackend, MemoryBackend};

/// Parse a console address (hex, with or without 0x prefix)
pub fn parse_console_address(s: &str) -> Result<u32> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).map_err(|e| anyhow!("Invalid hex address {}: {}", s, e))
}

/// Run the hexdump command
pub fn run(address: u32, size: usize, ascii: bool) -> Result<()> {
    let mut backend = DolphinBackend::new();
    backend.attach().context("Failed to attach to Dolphin")?;
    let bytes = backend
        .read_bytes(address, size)
        .with_context(|| format!("Failed to read {} bytes at {:#X}", size, address))?;
    backend.detach();

    println!("Hexdump at 0x{:X} ({} bytes):", address, size);
    println!();
    for line in format_lines(address, &bytes, ascii) {
        println!("{}", line);
    }
    Ok(())
}

fn format_lines(address: u32, bytes: &[u8], ascii: bool) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let mut line = format!("0x{:08X}: ", address.wrapping_add(i as u32 * 16));

            for j in 0..16 {
                if j == 8 {
                    line.push(' ');
                }
                match chunk.get(j) {
                    Some(byte) => line.push_str(&format!("{:02X} ", byte)),
                    None => line.push_str("   "),
                }
            }

            if ascii {
                line.push_str(" |");
                for byte in chunk {
                    line.push(if (0x20..0x7F).contains(byte) {
                        *byte as char
                    } else {
                        '.'
                    });
                }
                for _ in chunk.len()..16 {
                    line.push(' ');
                }
                line.push('|');
            }

            line.trim_end().to_string()
        })
        .collect()
}
