//! `modelstage check <dir>` – list present and missing model files.

use anyhow::Result;
use modelstage_core::stage::model_status;
use std::path::Path;

pub fn run_check(dir: &Path) -> Result<()> {
    let status = model_status(dir);
    for name in &status.present {
        println!("  present  {name}");
    }
    for name in &status.missing {
        println!("  missing  {name}");
    }
    if !status.is_usable() {
        anyhow::bail!("model in {} is incomplete", dir.display());
    }
    println!("Model in {} is usable.", dir.display());
    Ok(())
}
