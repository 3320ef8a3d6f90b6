//! `vigil init` - write a commented starter configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;

use crate::config::STARTER_CONFIG;
use crate::utils::emit;

pub const DEFAULT_CONFIG_FILE: &str = "vigil.toml";

pub fn execute(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if path.exists() {
        bail!(
            "{} already exists; refusing to overwrite it",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    fs::write(&path, STARTER_CONFIG)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    emit(format!(
        "{} wrote starter config to {}",
        "✓".green(),
        path.display()
    ));
    emit("Edit the [[watch]] entries, then start with: vigil run --config <path>".dimmed());
    Ok(())
}
