use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::{FetchOptions, DEFAULT_CHUNK_SIZE};
use crate::stage::StageOptions;

/// Default source for the bundled recognition model.
pub const DEFAULT_MODEL_URL: &str =
    "https://paddleocr.bj.bcebos.com/PP-OCRv3/english/en_PP-OCRv3_rec_infer.tar";

/// Global configuration loaded from `~/.config/modelstage/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Root under which per-model directories are derived from URLs.
    #[serde(default)]
    pub model_root: Option<PathBuf>,
    /// URL used when the caller gives a plain directory or nothing at all.
    #[serde(default = "default_url")]
    pub default_url: String,
    /// Buffered write size for downloads, in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Optional connect timeout in seconds (None = libcurl default).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Keep the downloaded `.tar` next to the extracted files.
    #[serde(default)]
    pub keep_archive: bool,
}

fn default_url() -> String {
    DEFAULT_MODEL_URL.to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            model_root: None,
            default_url: default_url(),
            chunk_size: default_chunk_size(),
            connect_timeout_secs: None,
            keep_archive: false,
        }
    }
}

impl StageConfig {
    /// Model root from the config file, or `~/.local/share/modelstage/models`.
    pub fn model_root(&self) -> Result<PathBuf> {
        match &self.model_root {
            Some(p) => Ok(p.clone()),
            None => default_model_root(),
        }
    }

    pub fn stage_options(&self) -> StageOptions {
        StageOptions {
            fetch: FetchOptions {
                chunk_size: self.chunk_size.max(1),
                connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            },
            keep_archive: self.keep_archive,
        }
    }
}

pub fn default_model_root() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("modelstage")?;
    Ok(xdg_dirs.get_data_home().join("modelstage").join("models"))
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("modelstage")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<StageConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<StageConfig> {
    if !path.exists() {
        let default_cfg = StageConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: StageConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = StageConfig::default();
        assert!(cfg.model_root.is_none());
        assert_eq!(cfg.default_url, DEFAULT_MODEL_URL);
        assert_eq!(cfg.chunk_size, 1024);
        assert!(cfg.connect_timeout_secs.is_none());
        assert!(!cfg.keep_archive);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = StageConfig {
            model_root: Some(PathBuf::from("/srv/models")),
            connect_timeout_secs: Some(10),
            ..StageConfig::default()
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: StageConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.model_root, cfg.model_root);
        assert_eq!(parsed.default_url, cfg.default_url);
        assert_eq!(parsed.chunk_size, cfg.chunk_size);
        assert_eq!(parsed.connect_timeout_secs, Some(10));
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let toml = r#"
            keep_archive = true
            chunk_size = 65536
        "#;
        let cfg: StageConfig = toml::from_str(toml).unwrap();
        assert!(cfg.keep_archive);
        assert_eq!(cfg.chunk_size, 65536);
        assert_eq!(cfg.default_url, DEFAULT_MODEL_URL);
        assert!(cfg.model_root.is_none());
    }

    #[test]
    fn explicit_model_root_wins() {
        let cfg = StageConfig {
            model_root: Some(PathBuf::from("/srv/models")),
            ..StageConfig::default()
        };
        assert_eq!(cfg.model_root().unwrap(), PathBuf::from("/srv/models"));
    }

    #[test]
    fn stage_options_from_config() {
        let cfg = StageConfig {
            chunk_size: 0,
            connect_timeout_secs: Some(5),
            keep_archive: true,
            ..StageConfig::default()
        };
        let opts = cfg.stage_options();
        assert_eq!(opts.fetch.chunk_size, 1);
        assert_eq!(opts.fetch.connect_timeout, Some(Duration::from_secs(5)));
        assert!(opts.keep_archive);
    }

    #[test]
    fn load_or_init_creates_then_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.chunk_size, 1024);

        fs::write(&path, "default_url = \"https://example.com/m.tar\"\n").unwrap();
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.default_url, "https://example.com/m.tar");
    }

    #[test]
    fn load_or_init_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "chunk_size = \"big\"").unwrap();
        assert!(load_or_init_at(&path).is_err());
    }
}
