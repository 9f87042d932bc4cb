//! Batch processing of an input folder.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};

use crate::blending::{self, TRANSPARENT_BLACK};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{is_png, is_supported_image, save_image, OutputFormat};
use crate::placement::{round_coordinate, watermark_position};
use crate::resize::resize_cover;
use crate::watermark::WatermarkAsset;

/// Outcome of a single input entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Converted and written to the output folder.
    Processed,
    /// Not an image type this tool handles.
    Skipped,
    /// The pipeline failed for this file; the batch carried on.
    Failed,
}

/// Result of processing a single input file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the source file.
    pub path: PathBuf,
    /// What happened to it.
    pub status: FileStatus,
    /// Where the output was written, if anywhere.
    pub output: Option<PathBuf>,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    /// File name of the source, for display.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |f| f.to_string_lossy().to_string(),
        )
    }
}

/// How a run ended when no precondition failed.
#[derive(Debug)]
pub enum RunOutcome {
    /// The input folder had no entries; nothing was done.
    EmptyInput,
    /// Every entry was visited; one result per file (directories excluded).
    Completed(Vec<ProcessResult>),
}

/// Per-status counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files written.
    pub processed: usize,
    /// Files skipped as unsupported.
    pub skipped: usize,
    /// Files that failed.
    pub failed: usize,
}

impl BatchSummary {
    /// Count the statuses in `results`.
    #[must_use]
    pub fn from_results(results: &[ProcessResult]) -> Self {
        let mut summary = Self::default();
        for r in results {
            match r.status {
                FileStatus::Processed => summary.processed += 1,
                FileStatus::Skipped => summary.skipped += 1,
                FileStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }
}

/// Drives one run: preconditions, watermark preparation and the per-file pipeline.
///
/// The steps are public so a front end can report between them; [`BatchProcessor::run`]
/// chains them in order.
pub struct BatchProcessor {
    config: Config,
    base_dir: PathBuf,
    codec: OutputFormat,
    watermark: Option<WatermarkAsset>,
}

impl BatchProcessor {
    /// Create a processor for `config`, resolving relative assets against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the output format is unknown.
    pub fn new(config: Config, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let codec = config.output_codec()?;
        Ok(Self {
            config,
            base_dir: base_dir.into(),
            codec,
            watermark: None,
        })
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolved watermark image path.
    #[must_use]
    pub fn watermark_path(&self) -> PathBuf {
        self.config.watermark_path(&self.base_dir)
    }

    /// Verify the watermark image exists when watermarking is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WatermarkMissing`] with the resolved path.
    pub fn check_watermark(&self) -> Result<()> {
        if !self.config.watermark.enabled {
            return Ok(());
        }
        let path = self.watermark_path();
        if path.exists() {
            Ok(())
        } else {
            Err(Error::WatermarkMissing { path })
        }
    }

    /// Create the input and output folders if they are absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if a folder cannot be created.
    pub fn prepare_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config.input_folder)?;
        std::fs::create_dir_all(&self.config.output_folder)?;
        Ok(())
    }

    /// All entries of the input folder (non-recursive), sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the folder cannot be read.
    pub fn list_input(&self) -> Result<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(&self.config.input_folder)?
            .map(|e| e.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }

    /// Decode and cache the watermark. Does nothing when watermarking is off
    /// or the asset is already loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the watermark cannot be found or decoded.
    pub fn load_watermark(&mut self) -> Result<()> {
        if self.config.watermark.enabled && self.watermark.is_none() {
            let asset = WatermarkAsset::load(&self.watermark_path(), self.config.watermark.width)?;
            self.watermark = Some(asset);
        }
        Ok(())
    }

    /// The cached watermark, if loaded.
    #[must_use]
    pub fn watermark(&self) -> Option<&WatermarkAsset> {
        self.watermark.as_ref()
    }

    /// Run every step in order.
    ///
    /// # Errors
    ///
    /// Returns precondition errors ([`Error::WatermarkMissing`], I/O on the folders,
    /// watermark decoding). Per-file failures are reported in the results instead.
    pub fn run(&mut self) -> Result<RunOutcome> {
        self.check_watermark()?;
        self.prepare_directories()?;

        let entries = self.list_input()?;
        if entries.is_empty() {
            return Ok(RunOutcome::EmptyInput);
        }

        self.load_watermark()?;
        Ok(RunOutcome::Completed(self.process_entries(&entries)))
    }

    /// Process a list of input entries.
    ///
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon).
    /// Entries that map to the same output file are handled one after another
    /// in list order, so the last of them wins as it would in a sequential run.
    /// Results keep the order of `entries`; directories produce no result.
    #[must_use]
    pub fn process_entries(&self, entries: &[PathBuf]) -> Vec<ProcessResult> {
        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            let mut indexed: Vec<(usize, ProcessResult)> = self
                .output_groups(entries)
                .par_iter()
                .flat_map_iter(|group| {
                    group
                        .iter()
                        .filter_map(|&i| self.process_entry(&entries[i]).map(|r| (i, r)))
                        .collect::<Vec<_>>()
                })
                .collect();
            indexed.sort_by_key(|(i, _)| *i);
            indexed.into_iter().map(|(_, r)| r).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            entries
                .iter()
                .filter_map(|path| self.process_entry(path))
                .collect()
        }
    }

    /// Indices of `entries` grouped by the output path they would be written to.
    ///
    /// Groups appear in order of their first entry; indices inside a group ascend.
    #[must_use]
    pub fn output_groups(&self, entries: &[PathBuf]) -> Vec<Vec<usize>> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut by_output: HashMap<PathBuf, usize> = HashMap::new();
        for (i, path) in entries.iter().enumerate() {
            let output = self.config.output_path_for(path);
            if let Some(&g) = by_output.get(&output) {
                groups[g].push(i);
            } else {
                by_output.insert(output, groups.len());
                groups.push(vec![i]);
            }
        }
        groups
    }

    /// Classify one entry and run the pipeline on it if it is a supported image.
    ///
    /// Returns `None` for directories.
    #[must_use]
    pub fn process_entry(&self, path: &Path) -> Option<ProcessResult> {
        let mut result = ProcessResult {
            path: path.to_path_buf(),
            status: FileStatus::Failed,
            output: None,
            message: String::new(),
        };

        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => return None,
            Ok(_) => {}
            Err(e) => {
                result.message = format!("Failed to stat: {e}");
                return Some(result);
            }
        }

        if !is_supported_image(path) {
            result.status = FileStatus::Skipped;
            result.message = "unsupported file type".to_string();
            return Some(result);
        }

        let output = self.config.output_path_for(path);
        match self.process_file(path, &output) {
            Ok(()) => {
                result.status = FileStatus::Processed;
                result.message = output.file_name().map_or_else(
                    || output.display().to_string(),
                    |f| f.to_string_lossy().to_string(),
                );
                result.output = Some(output);
            }
            Err(e) => {
                result.message = e.to_string();
            }
        }

        Some(result)
    }

    /// Run the full pipeline on one file and write the result to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding, compositing, encoding or writing fails.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<()> {
        let rendered = self.render(input)?;
        save_image(&rendered, self.codec, output)
    }

    /// Decode, flatten, resize and watermark one file.
    fn render(&self, input: &Path) -> Result<DynamicImage> {
        let mut img = ImageReader::open(input)?.with_guessed_format()?.decode()?;

        if self.config.remove_white_background && is_png(input) {
            img = blending::flatten(blending::remove_alpha(&img), TRANSPARENT_BLACK);
        }

        let (width, height) = (self.config.width, self.config.height);
        let resized = resize_cover(&img, width, height);

        if !self.config.watermark.enabled {
            return Ok(resized);
        }
        let Some(asset) = &self.watermark else {
            return Err(Error::WatermarkMissing {
                path: self.watermark_path(),
            });
        };

        blending::ensure_fits((width, height), asset.dimensions())?;
        let wm = &self.config.watermark;
        let (x, y) = watermark_position(
            (width, height),
            asset.dimensions(),
            wm.anchor(),
            wm.padding(),
        );

        let mut canvas = resized.to_rgba8();
        blending::composite_over(
            &mut canvas,
            asset.image(),
            round_coordinate(x),
            round_coordinate(y),
            wm.opacity,
        );
        Ok(DynamicImage::ImageRgba8(canvas))
    }
}
