//! Configuration module.
//!
//! This module defines the command-line interface (CLI) using `clap`.

use clap::Parser;
use std::path::PathBuf;

/// Rewrites the LC_UUID load command of a linked Mach-O image.
///
/// The new UUID is derived from the build id, so the same build id always
/// yields the same bytes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Linked Mach-O image to read
    pub input: PathBuf,

    /// Output file
    #[arg(short, long, required_unless_present = "print", help = "Path to the rewritten image")]
    pub output: Option<PathBuf>,

    /// Build id to derive the UUID from (empty yields the all-zero UUID)
    #[arg(long, default_value = "")]
    pub build_id: String,

    /// Print the input's current UUID and exit
    #[arg(long)]
    pub print: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rewrite_invocation() {
        let config =
            Config::try_parse_from(["machuuid", "a.out", "-o", "b.out", "--build-id", "abc"])
                .unwrap();
        assert_eq!(config.input, PathBuf::from("a.out"));
        assert_eq!(config.output, Some(PathBuf::from("b.out")));
        assert_eq!(config.build_id, "abc");
        assert!(!config.print);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn output_required_without_print() {
        assert!(Config::try_parse_from(["machuuid", "a.out"]).is_err());
        let config = Config::try_parse_from(["machuuid", "a.out", "--print"]).unwrap();
        assert!(config.print);
        assert_eq!(config.output, None);
    }
}
