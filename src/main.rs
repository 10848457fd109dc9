//! Entry point for machuuid.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap`.
//! 2. Install the `tracing` subscriber.
//! 3. Map the input image and parse its Mach-O header.
//! 4. Either print the current UUID, or copy the image and rewrite its UUID.
//!
//! Error handling is done via `anyhow`.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use machuuid::config::Config;
use machuuid::{read_uuid, rewrite_uuid, ImageHeader};

fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let input = &config.input;
    let header = ImageHeader::from_path(input)
        .with_context(|| format!("failed to parse Mach-O header of {}", input.display()))?;

    if config.print {
        let file =
            File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
        match read_uuid(file, &header)? {
            Some(uuid) => println!("{}", Uuid::from_bytes(uuid)),
            None => anyhow::bail!("{} has no LC_UUID load command", input.display()),
        }
        return Ok(());
    }

    let output = config
        .output
        .as_deref()
        .context("no output path given")?;
    let written = rewrite_uuid(input, &header, output, &config.build_id)
        .with_context(|| format!("failed to rewrite {}", output.display()))?;

    match written {
        Some(uuid) => println!("{}", Uuid::from_bytes(uuid)),
        None => println!("{} copied without changes (no LC_UUID)", output.display()),
    }
    Ok(())
}
