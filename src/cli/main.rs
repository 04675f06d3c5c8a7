use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use exif_watermark::config::Config;
use exif_watermark::format::LocaleFormatter;
use exif_watermark::pipeline;
use exif_watermark::watermark::WatermarkFont;

#[derive(Parser, Debug)]
#[command(
    name = "exif-watermark",
    version,
    about = "Burn the EXIF capture date into every photo in ./input, writing copies to ./output"
)]
struct Cli {
    /// Print every EXIF entry of FILE and exit
    #[arg(long, value_name = "FILE")]
    inspect: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --inspect
    if let Some(ref path) = cli.inspect {
        print_entries(path);
        return Ok(());
    }

    log::info!("--- Starting EXIF Watermark ---");

    let config = Config::default();
    let formatter = LocaleFormatter::from_env();
    let font = WatermarkFont::load(&config.font_paths)?;

    pipeline::run_batch(&config, &font, &formatter);

    Ok(())
}

/// Dump all decoded EXIF entries of one file.
fn print_entries(path: &Path) {
    match pipeline::inspect_file(path) {
        Ok(entries) if entries.is_empty() => {
            println!("No EXIF data found in '{}'.", path.display());
        }
        Ok(entries) => {
            println!("EXIF data for '{}':", path.display());
            for entry in entries.iter() {
                println!("  Tag: {} (ID: {}), Value: {}", entry.name, entry.id, entry.value);
            }
        }
        Err(e) => log::error!("{e:#}"),
    }
}
