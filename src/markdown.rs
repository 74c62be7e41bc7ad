//! Markdown rendering with GitHub Flavored Markdown and math support.
//!
//! This module provides markdown rendering using comrak with GFM extensions
//! (tables, strikethrough, autolinks, task lists) and an extension point
//! through which math nodes are rendered by registered callbacks.

mod renderer;

pub use renderer::{
    EquationNumbering, MarkdownRenderer, MathVisitors, RenderedPage, TextFn, VisitFn,
};
