//! LaTeX to MathML conversion through blahtexml.
//!
//! Math nodes found while rendering documentation are handed to an external
//! converter (`blahtexml --mathml`), whose output is patched into a MathML
//! fragment and wrapped in `span.math` or `div.math` containers.

mod converter;
mod error;
mod html;
mod markup;
mod node;
mod session;

pub use converter::{BlahtexCommand, Converter, ConverterOutput};
pub use error::MathError;
pub use html::{HtmlTranslator, Visit, html_visit_displaymath, html_visit_math};
pub use markup::{MATHML_CLOSE, MATHML_OPEN, wrap_markup};
pub use node::{DisplayMath, InlineMath};
pub use session::MathSession;

use crate::markdown::{MarkdownRenderer, MathVisitors};

/// Registers the MathML callbacks on the renderer's math extension point.
///
/// Only HTML callbacks are supplied. No plain text renderer is registered,
/// so the host falls back to the raw LaTeX source where it needs text.
///
/// # Arguments
///
/// * `renderer`: Host renderer receiving the callbacks
/// * `session`: Build session owning the converter and its failure state
pub fn setup(renderer: &mut MarkdownRenderer<'_>, session: MathSession) {
    renderer.set_math(
        MathVisitors {
            inline: html_visit_math,
            display: html_visit_displaymath,
            text: None,
        },
        session,
    );
}
