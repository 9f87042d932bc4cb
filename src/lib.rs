//! Batch resize, watermark and convert a folder of images.
//!
//! A run is described by a `config.json` document: an input and output folder,
//! a target canvas size, an output codec and an optional watermark. Every
//! supported image in the input folder is cover-fitted to the canvas, stamped
//! with the watermark and written to the output folder under its original base
//! name with the configured extension.
//!
//! # Quick Start
//!
//! ```no_run
//! use batch_image_processor::{BatchProcessor, Config, RunOutcome};
//! use std::path::Path;
//!
//! let base = Path::new(".");
//! let config = Config::load(base).expect("failed to load config.json");
//! let mut processor = BatchProcessor::new(config, base).unwrap();
//! match processor.run().unwrap() {
//!     RunOutcome::EmptyInput => println!("nothing to do"),
//!     RunOutcome::Completed(results) => println!("{} files visited", results.len()),
//! }
//! ```
//!
//! # Placement
//!
//! The watermark position is computed from a named anchor and a padding:
//!
//! ```
//! use batch_image_processor::placement::{watermark_position, Anchor};
//!
//! let (x, y) = watermark_position((800, 600), (200, 50), Anchor::from_name("top-right"), 20);
//! assert_eq!((x, y), (580.0, 20.0));
//! ```

#![deny(missing_docs)]

pub mod blending;
pub mod config;
pub mod error;
pub mod format;
pub mod placement;
mod processor;
pub mod resize;
pub mod svg;
mod watermark;

pub use config::{Config, WatermarkConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use format::{is_supported_image, OutputFormat, ENCODE_QUALITY};
pub use placement::Anchor;
pub use processor::{BatchProcessor, BatchSummary, FileStatus, ProcessResult, RunOutcome};
pub use watermark::WatermarkAsset;
