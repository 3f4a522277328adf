/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use i8080_core::config::parse_address;
use i8080_core::disasm::Listing;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "disassembler")]
#[command(about = "Lists the Intel 8080 instructions of a raw image", long_about = None)]
struct Args {
    /// Path to the raw image
    rom: PathBuf,

    /// Address of the first byte of the image, decimal or 0x prefixed hex
    #[arg(long, default_value = "0", value_parser = parse_address)]
    base: u16,

    /// Print the file size before the listing
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let bytes = fs::read(&args.rom)
        .with_context(|| format!("failed to read image {}", args.rom.display()))?;
    if args.verbose {
        println!("; {} - {} bytes", args.rom.display(), bytes.len());
    }

    for line in Listing::new(&bytes) {
        let line = line.context("incomplete instruction at the end of the image")?;
        println!("{:04x}  {}", args.base as usize + line.offset, line.text);
    }
    Ok(())
}
