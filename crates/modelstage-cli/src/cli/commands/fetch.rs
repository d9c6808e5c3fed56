//! `modelstage fetch [MODEL]` – resolve, then stage the model files.

use anyhow::{Context, Result};
use modelstage_core::config::StageConfig;
use modelstage_core::{maybe_download, StageOutcome};

use super::resolve::ModelArgs;
use crate::cli::progress::ConsoleProgress;

pub fn run_fetch(cfg: &StageConfig, args: &ModelArgs, force: bool) -> Result<()> {
    let resolved = args.resolve(cfg)?;
    let opts = cfg.stage_options();
    let mut progress = ConsoleProgress::new();

    let result = maybe_download(&resolved.model_dir, &resolved.url, force, &opts, &mut progress);
    progress.finish();
    let outcome = result
        .with_context(|| format!("staging model into {}", resolved.model_dir.display()))?;

    let dir = resolved.model_dir.display();
    match &outcome {
        StageOutcome::AlreadyPresent => println!("Model already present in {dir}"),
        StageOutcome::Downloaded { files } => {
            println!("Downloaded {} into {dir}: {}", resolved.url, files.join(", "))
        }
        StageOutcome::Extracted { files } => {
            println!("Extracted {} into {dir}: {}", resolved.url, files.join(", "))
        }
        StageOutcome::Copied { files } => {
            println!("Copied from {} into {dir}: {}", resolved.url, files.join(", "))
        }
    }
    tracing::info!(model_dir = %dir, ?outcome, "fetch completed");
    Ok(())
}
