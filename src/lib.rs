//! Markdown documentation builder with LaTeX math rendered as MathML.

mod assets;
mod config;
mod layout;
pub mod markdown;
pub mod math;
mod site;

pub use assets::write_css_assets;
pub use config::Config;
pub use layout::page_wrapper;
pub use markdown::{EquationNumbering, MarkdownRenderer, MathVisitors, RenderedPage};
pub use math::{BlahtexCommand, Converter, ConverterOutput, MathError, MathSession};
pub use site::{BuildReport, build_site, collect_pages};
