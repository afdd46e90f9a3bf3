use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use file_compressor_rust::{
    format_file_size, CompressionProfile, Compressor, CompressorConfig, Level, Mode,
};

const DEFAULT_TARGET_BYTES: u64 = 1024 * 1024;

/// Shrinks PDFs, images, office documents and text files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file
    input: PathBuf,

    /// Output file (defaults to compressed_<name> next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compression level: extreme, high or normal
    #[arg(long, default_value = "extreme")]
    level: Level,

    /// Target size in bytes (0 disables size convergence)
    #[arg(long, default_value_t = DEFAULT_TARGET_BYTES)]
    target_size: u64,

    /// size: allow format changes to reach the target; quality: keep PNGs lossless
    #[arg(long, default_value = "size")]
    mode: Mode,

    /// Reject inputs larger than this many bytes
    #[arg(long, default_value_t = file_compressor_rust::config::DEFAULT_MAX_INPUT_BYTES)]
    max_input_size: u64,

    /// Only accept known file types
    #[arg(long)]
    strict: bool,

    /// pdftoppm binary used for PDF rasterization
    #[arg(long, env = "FILE_COMPRESSOR_PDFTOPPM", default_value = "pdftoppm")]
    pdftoppm: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file_name = args
        .input
        .file_name()
        .and_then(|name| name.to_str())
        .context("Input path has no usable file name")?
        .to_string();

    let config = CompressorConfig {
        max_input_bytes: args.max_input_size,
        allow_generic: !args.strict,
        pdftoppm: args.pdftoppm.clone(),
        ..CompressorConfig::default()
    };
    let profile = CompressionProfile::new(args.level)
        .with_target_size(args.target_size)
        .with_mode(args.mode);

    println!("Loading: {:?}", args.input);
    let data = std::fs::read(&args.input).context("Failed to read input file")?;

    let compressor = Compressor::new(config);
    let start = Instant::now();
    let outcome = compressor.compress(data, &file_name, &profile)?;
    println!("Compressed in {:.2?}", start.elapsed());

    let output = args.output.unwrap_or_else(|| args.input.with_file_name(&outcome.file_name));
    std::fs::write(&output, &outcome.data)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if outcome.degraded {
        eprintln!("Compression failed, wrote an unmodified copy.");
    }
    println!("Strategy:      {}", outcome.strategy);
    println!("Original size: {}", format_file_size(outcome.original_size));
    println!("New size:      {}", format_file_size(outcome.compressed_size));
    println!("Saved:         {:.1}%", outcome.ratio());
    println!("Written to:    {:?}", output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["file-compressor", "in.pdf"]);
        assert_eq!(args.target_size, 1024 * 1024);
        assert_eq!(args.level, Level::Extreme);
        assert_eq!(args.mode, Mode::Size);
        assert!(!args.strict);
    }

    #[test]
    fn test_zero_target_disables_convergence() {
        let args = Args::parse_from(["file-compressor", "in.png", "--target-size", "0"]);
        let profile = CompressionProfile::new(args.level).with_target_size(args.target_size);
        assert_eq!(profile.target_bytes(), None);
    }
}
