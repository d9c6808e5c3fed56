//! CLI for staging OCR inference models.

mod commands;
mod progress;

use anyhow::Result;
use clap::{Parser, Subcommand};
use modelstage_core::config;
use std::path::PathBuf;

use commands::{run_check, run_fetch, run_resolve, ModelArgs};

/// Top-level CLI for modelstage.
#[derive(Debug, Parser)]
#[command(name = "modelstage")]
#[command(about = "Fetch and stage pretrained OCR inference models", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Make sure the model files are present, downloading or copying them if needed.
    Fetch {
        /// Model directory or `.tar` URL (default: the configured default URL).
        model: Option<String>,

        /// Stage again even if the model files already exist.
        #[arg(long)]
        force: bool,

        /// Source URL used when MODEL is a directory or omitted.
        #[arg(long, value_name = "URL")]
        default_url: Option<String>,

        /// Root under which URL-derived model directories are created.
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Print the directory and source URL a model would be staged from.
    Resolve {
        /// Model directory or `.tar` URL.
        model: Option<String>,

        /// Source URL used when MODEL is a directory or omitted.
        #[arg(long, value_name = "URL")]
        default_url: Option<String>,

        /// Root under which URL-derived model directories are created.
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Report which model files are present in a directory.
    Check {
        /// Model directory.
        dir: PathBuf,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                model,
                force,
                default_url,
                root,
            } => {
                let args = ModelArgs {
                    model,
                    default_url,
                    root,
                };
                run_fetch(&cfg, &args, force)?;
            }
            CliCommand::Resolve {
                model,
                default_url,
                root,
            } => {
                let args = ModelArgs {
                    model,
                    default_url,
                    root,
                };
                run_resolve(&cfg, &args)?;
            }
            CliCommand::Check { dir } => run_check(&dir)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
