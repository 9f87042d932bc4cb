use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use batch_image_processor::{
    BatchProcessor, BatchSummary, Config, Error, FileStatus, ProcessResult, CONFIG_FILE_NAME,
};

#[derive(Parser)]
#[command(
    name = "batch-images",
    about = "Resize, watermark and convert every image in a folder",
    version,
    after_help = "Settings are read from config.json in the base directory \
                  (the executable's directory unless --base-dir is given)."
)]
struct Cli {
    /// Directory holding config.json; relative watermark paths resolve here
    #[arg(short, long)]
    base_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    let base_dir = cli.base_dir.clone().unwrap_or_else(default_base_dir);

    let config = match Config::load(&base_dir) {
        Ok(c) => c,
        Err(Error::ConfigMissing { path }) => {
            eprintln!("Error: {CONFIG_FILE_NAME} not found at {}", path.display());
            eprintln!("  -> Place {CONFIG_FILE_NAME} next to the executable or pass --base-dir");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(config, &base_dir, &cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(config: Config, base_dir: &Path, cli: &Cli) -> batch_image_processor::Result<()> {
    let mut processor = BatchProcessor::new(config, base_dir)?;

    if let Err(Error::WatermarkMissing { path }) = processor.check_watermark() {
        eprintln!("Error: watermark image not found at {}", path.display());
        eprintln!("  -> Put a watermark image at that location or disable the watermark");
        return Ok(());
    }

    processor.prepare_directories()?;
    let input_folder = processor.config().input_folder.clone();
    let entries = processor.list_input()?;
    if entries.is_empty() {
        eprintln!("[WARN] No files in the input folder");
        eprintln!("  -> Put your images in {}", input_folder.display());
        return Ok(());
    }

    if !cli.quiet {
        eprintln!("Processing {} entries from {}", entries.len(), input_folder.display());
        eprintln!();
    }

    processor.load_watermark()?;
    if cli.verbose {
        if let Some(wm) = processor.watermark() {
            let settings = &processor.config().watermark;
            eprintln!(
                "Watermark ready: {}x{} at {} (padding {}px)",
                wm.width(),
                wm.height(),
                settings.anchor().name(),
                settings.padding()
            );
        }
    }

    let results = processor.process_entries(&entries);
    for r in &results {
        print_result(r, cli);
    }

    if !cli.quiet {
        let summary = BatchSummary::from_results(&results);
        eprintln!();
        eprint!("[Summary] Processed: {}", summary.processed);
        if summary.skipped > 0 {
            eprint!(", Skipped: {}", summary.skipped);
        }
        if summary.failed > 0 {
            eprint!(", Failed: {}", summary.failed);
        }
        eprintln!(" (Total: {})", results.len());
        eprintln!(
            "Done. Processed images are in {}",
            processor.config().output_folder.display()
        );
    }

    Ok(())
}

fn print_result(result: &ProcessResult, cli: &Cli) {
    let filename = result.file_name();

    match result.status {
        FileStatus::Processed => {
            if !cli.quiet {
                eprintln!("[OK] {filename} -> {}", result.message);
            }
        }
        FileStatus::Skipped => {
            if !cli.quiet {
                eprintln!("[SKIP] {filename}: {}", result.message);
            }
        }
        FileStatus::Failed => eprintln!("[FAIL] {filename}: {}", result.message),
    }

    if cli.verbose {
        if let Some(out) = &result.output {
            eprintln!("  -> {}", out.display());
        }
    }
}

fn default_base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
