//! `modelstage resolve [MODEL]` – show where a model would be staged from and to.

use anyhow::Result;
use modelstage_core::config::StageConfig;
use modelstage_core::{resolve_model_dir, ResolvedModel};
use std::path::PathBuf;

/// Model selection shared by `fetch` and `resolve`; flags override config.
#[derive(Debug, Clone, Default)]
pub struct ModelArgs {
    pub model: Option<String>,
    pub default_url: Option<String>,
    pub root: Option<PathBuf>,
}

impl ModelArgs {
    pub fn resolve(&self, cfg: &StageConfig) -> Result<ResolvedModel> {
        let root = match &self.root {
            Some(r) => r.clone(),
            None => cfg.model_root()?,
        };
        let default_url = self.default_url.as_deref().unwrap_or(&cfg.default_url);
        Ok(resolve_model_dir(self.model.as_deref(), &root, default_url))
    }
}

pub fn run_resolve(cfg: &StageConfig, args: &ModelArgs) -> Result<()> {
    let resolved = args.resolve(cfg)?;
    println!("dir: {}", resolved.model_dir.display());
    println!("url: {}", resolved.url);
    Ok(())
}
