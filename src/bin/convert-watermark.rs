use std::path::PathBuf;
use std::process;

use clap::Parser;

use batch_image_processor::svg::{convert_to_png, DEFAULT_RASTER_WIDTH};

#[derive(Parser)]
#[command(
    name = "convert-watermark",
    about = "Rasterize an SVG watermark to PNG ahead of a batch run",
    version
)]
struct Cli {
    /// SVG watermark to convert
    #[arg(default_value = "watermark.svg")]
    input: PathBuf,

    /// PNG file to write
    #[arg(short, long, default_value = "watermark.png")]
    output: PathBuf,

    /// Width of the raster in pixels; height keeps the aspect ratio
    #[arg(short, long, default_value_t = DEFAULT_RASTER_WIDTH)]
    width: u32,
}

fn main() {
    let cli = Cli::parse();

    if cli.width == 0 {
        eprintln!("Error: Width must be greater than zero");
        process::exit(1);
    }

    match convert_to_png(&cli.input, &cli.output, cli.width) {
        Ok(()) => eprintln!("[OK] Watermark converted: {}", cli.output.display()),
        Err(e) => {
            eprintln!("[FAIL] {}: {e}", cli.input.display());
            process::exit(1);
        }
    }
}
