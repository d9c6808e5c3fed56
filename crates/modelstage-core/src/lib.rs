//! Fetch and stage pretrained OCR inference models.
//!
//! Given a directory or URL, [`resolve::resolve_model_dir`] picks the local
//! model directory and [`stage::maybe_download`] makes sure the inference
//! files end up in it, downloading and extracting a tar archive or copying
//! from a local directory as needed.

pub mod config;
pub mod logging;

pub mod error;
pub mod extract;
pub mod fetch;
pub mod resolve;
pub mod stage;

pub use error::{StageError, StageResult};
pub use fetch::{NoProgress, ProgressSink, ProgressStats};
pub use resolve::{resolve_model_dir, ResolvedModel};
pub use stage::{maybe_download, ModelSource, StageOptions, StageOutcome, MODEL_FILE_NAMES};
