//! Patches blahtexml output into a MathML fragment.

/// Opening tag replacing the blahtexml header.
pub const MATHML_OPEN: &str = r#"<math xmlns="http://www.w3.org/1998/Math/MathML">"#;

/// Closing tag replacing the blahtexml footer.
pub const MATHML_CLOSE: &str = "</math>";

const BLAHTEX_HEADER: &str = "<blahtex>\n<mathml>\n<markup>\n";
const BLAHTEX_FOOTER: &str = "</markup>\n</mathml>\n</blahtex>\n";

/// Turns raw converter output into a MathML fragment.
///
/// Performs literal substitution of the blahtexml envelope. The output is
/// not parsed, so anything outside the envelope passes through unchanged.
///
/// # Arguments
///
/// * `output`: Standard output captured from the converter
///
/// # Returns
///
/// MathML fragment, or None when the converter produced no markup
pub fn wrap_markup(output: &str) -> Option<String> {
    let fragment = output
        .replace(BLAHTEX_HEADER, MATHML_OPEN)
        .replace(BLAHTEX_FOOTER, MATHML_CLOSE);

    let empty_envelope = fragment.len() == MATHML_OPEN.len() + MATHML_CLOSE.len()
        && fragment.starts_with(MATHML_OPEN)
        && fragment.ends_with(MATHML_CLOSE);

    if fragment.is_empty() || empty_envelope {
        None
    } else {
        Some(fragment)
    }
}
