//! Documentation build loop.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

use crate::assets::{STYLESHEET, write_css_assets};
use crate::layout::page_wrapper;
use crate::markdown::{EquationNumbering, MarkdownRenderer};
use crate::math::{self, MathSession};

/// Outcome of a successful build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Generated HTML files.
    pub pages: Vec<PathBuf>,
    /// Converter runs that completed.
    pub equations_converted: usize,
    /// Non-fatal problems reported by the math extension.
    pub warnings: Vec<String>,
}

/// Builds every markdown page under `input` into HTML under `output`.
///
/// All pages share one renderer and one math session, so a converter
/// that cannot be started is reported once per build.
///
/// # Arguments
///
/// * `input`: Markdown file or directory of markdown files
/// * `output`: Output directory
/// * `project`: Project name shown in page headers and titles
/// * `numbering`: Display equation numbering mode
/// * `session`: Math session for this build
///
/// # Errors
///
/// Returns error if a page cannot be read, rendered or written. A converter
/// exiting with non-zero status aborts the build.
pub fn build_site(
    input: &Path,
    output: &Path,
    project: &str,
    numbering: EquationNumbering,
    session: MathSession,
) -> Result<BuildReport> {
    let sources = collect_pages(input)?;

    let mut renderer = MarkdownRenderer::new().with_numbering(numbering);
    math::setup(&mut renderer, session);

    fs::create_dir_all(output).context("Failed to create output directory")?;
    write_css_assets(&output.join("assets"))?;

    let mut report = BuildReport::default();
    for (source, relative) in &sources {
        let page = renderer
            .render_file(source)
            .with_context(|| format!("Failed to render {}", source.display()))?;

        let title = page.title.unwrap_or_else(|| {
            relative
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(project)
                .to_string()
        });
        let stylesheet = format!("{}{}", "../".repeat(page_depth(relative)), STYLESHEET);
        let html = page_wrapper(&title, project, &stylesheet, &page.html);

        let target = output.join(relative).with_extension("html");
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&target, html.into_string())
            .with_context(|| format!("Failed to write page to {}", target.display()))?;

        report.pages.push(target);
    }

    if let Some(session) = renderer.math_session() {
        report.equations_converted = session.conversions();
        report.warnings = session.warnings().to_vec();
    }

    Ok(report)
}

/// Lists markdown pages with their paths relative to `input`.
///
/// A single file yields itself. Directories are walked recursively and the
/// result is sorted by relative path.
///
/// # Errors
///
/// Returns error if a directory cannot be read or no page is found
pub fn collect_pages(input: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    if input.is_file() {
        let name = input
            .file_name()
            .with_context(|| format!("Input has no file name: {}", input.display()))?;
        return Ok(vec![(input.to_path_buf(), PathBuf::from(name))]);
    }

    let mut pages = Vec::new();
    let mut pending = vec![input.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;

        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to read entry in {}", dir.display()))?
                .path();

            if path.is_dir() {
                pending.push(path);
            } else if is_markdown(&path) {
                let relative = path
                    .strip_prefix(input)
                    .context("Page outside input directory")?
                    .to_path_buf();
                pages.push((path, relative));
            }
        }
    }

    if pages.is_empty() {
        bail!("No markdown pages found in {}", input.display());
    }

    pages.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(pages)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

/// Number of `../` prefixes needed to reach output root from a page.
fn page_depth(relative: &Path) -> usize {
    relative.components().count().saturating_sub(1)
}
