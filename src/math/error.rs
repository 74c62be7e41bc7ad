//! Build fatal math errors.

use thiserror::Error;

/// Errors that abort a documentation build.
///
/// A converter that cannot be started is not an error; the session records
/// a warning instead and stops invoking it.
#[derive(Debug, Error)]
pub enum MathError {
    /// Converter ran but exited with a non-zero status.
    #[error("{program} exited with error ({status}):\n[stderr]\n{stderr}\n[stdout]\n{stdout}")]
    ConverterFailed {
        program: String,
        status: String,
        stdout: String,
        stderr: String,
    },
}

impl MathError {
    pub(crate) fn converter_failed(
        program: &str,
        code: Option<i32>,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        let status = match code {
            Some(code) => format!("status {}", code),
            None => "terminated by signal".to_string(),
        };
        Self::ConverterFailed {
            program: program.to_string(),
            status,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }
}
