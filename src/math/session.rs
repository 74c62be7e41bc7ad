//! Per build conversion state.

use super::converter::{BlahtexCommand, Converter};
use super::error::MathError;
use super::markup::wrap_markup;

/// Conversion state shared by every math node of one build.
///
/// Once the converter fails to start, the session stops invoking it and
/// every further node renders without MathML content. A new build starts
/// from a new session.
pub struct MathSession {
    converter: Box<dyn Converter>,
    converter_unavailable: bool,
    warnings: Vec<String>,
    conversions: usize,
}

impl MathSession {
    pub fn new(converter: impl Converter + 'static) -> Self {
        Self {
            converter: Box::new(converter),
            converter_unavailable: false,
            warnings: Vec::new(),
            conversions: 0,
        }
    }

    /// Converts LaTeX source into a MathML fragment.
    ///
    /// # Arguments
    ///
    /// * `latex`: Math source of one node
    ///
    /// # Returns
    ///
    /// MathML fragment, or None when the converter is unavailable or
    /// produced no markup
    ///
    /// # Errors
    ///
    /// Returns error if the converter exits with a non-zero status
    pub fn build_mathml(&mut self, latex: &str) -> Result<Option<String>, MathError> {
        if self.converter_unavailable {
            return Ok(None);
        }

        let output = match self.converter.convert(latex) {
            Ok(output) => output,
            Err(e) => {
                let program = self.converter.program().to_string();
                tracing::warn!(
                    program = %program,
                    error = %e,
                    "could not call math converter"
                );
                self.warnings.push(format!(
                    "could not call {}: {}. make sure it is installed and in PATH",
                    program, e
                ));
                self.converter_unavailable = true;
                return Ok(None);
            }
        };

        self.conversions += 1;

        if !output.success {
            return Err(MathError::converter_failed(
                self.converter.program(),
                output.code,
                &output.stdout,
                &output.stderr,
            ));
        }

        Ok(wrap_markup(&output.stdout))
    }

    /// Whether the converter failed to start during this build.
    pub fn converter_unavailable(&self) -> bool {
        self.converter_unavailable
    }

    /// Warnings recorded during this build.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Number of converter runs that completed.
    pub fn conversions(&self) -> usize {
        self.conversions
    }
}

impl Default for MathSession {
    fn default() -> Self {
        Self::new(BlahtexCommand::default())
    }
}

impl std::fmt::Debug for MathSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MathSession")
            .field("program", &self.converter.program())
            .field("converter_unavailable", &self.converter_unavailable)
            .field("warnings", &self.warnings)
            .field("conversions", &self.conversions)
            .finish()
    }
}
