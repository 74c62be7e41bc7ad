//! HTML rendering callbacks for math nodes.

use maud::{PreEscaped, html};

use super::error::MathError;
use super::node::{DisplayMath, InlineMath};
use super::session::MathSession;

/// Tells the host what to do after a callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Callback wrote the node; host skips its default rendering.
    SkipNode,
    /// Host renders the node itself.
    Default,
}

/// Output buffer and build session handed to math callbacks.
pub struct HtmlTranslator<'s> {
    pub body: String,
    pub session: &'s mut MathSession,
}

impl<'s> HtmlTranslator<'s> {
    pub fn new(session: &'s mut MathSession) -> Self {
        Self {
            body: String::new(),
            session,
        }
    }

    /// Consumes translator and returns written HTML.
    pub fn into_body(self) -> String {
        self.body
    }
}

/// Renders inline math as `<span class="math">`.
///
/// An absent fragment leaves the span empty.
///
/// # Errors
///
/// Returns error if the converter exits with a non-zero status
pub fn html_visit_math(
    translator: &mut HtmlTranslator<'_>,
    node: &InlineMath,
) -> Result<Visit, MathError> {
    let fragment = translator.session.build_mathml(&node.latex)?;

    let markup = html! {
        span class="math" {
            @if let Some(fragment) = fragment {
                (PreEscaped(fragment))
            }
        }
    };
    translator.body.push_str(&markup.into_string());

    Ok(Visit::SkipNode)
}

/// Renders display math as `<div class="math">` with optional numbering.
///
/// Only the first non-blank part of the source receives the number.
///
/// # Errors
///
/// Returns error if the converter exits with a non-zero status
pub fn html_visit_displaymath(
    translator: &mut HtmlTranslator<'_>,
    node: &DisplayMath,
) -> Result<Visit, MathError> {
    let fragment = translator.session.build_mathml(&node.latex)?;
    let id = node.label.as_ref().map(|label| format!("equation-{}", label));
    let numbered = !node.parts().is_empty();

    let markup = html! {
        div class="math" id=[id] {
            @if let Some(fragment) = fragment {
                (PreEscaped(fragment))
            }
            @if numbered {
                @if let Some(number) = node.number {
                    span class="eqno" { "(" (number) ")" }
                }
            }
        }
    };
    translator.body.push_str(&markup.into_string());

    Ok(Visit::SkipNode)
}
