//! CSS asset bundling

use anyhow::{Context, Result};
use std::{fs, path::Path};

const DOCS: &str = include_str!("../assets/docs.css");

/// Stylesheet path relative to the output root.
pub const STYLESHEET: &str = "assets/docs.css";

/// Writes bundled CSS assets to output directory
pub fn write_css_assets(assets_dir: &Path) -> Result<()> {
    fs::create_dir_all(assets_dir).context("Failed to create assets directory")?;
    fs::write(assets_dir.join("docs.css"), DOCS).context("Failed to write CSS asset: docs.css")?;
    Ok(())
}
