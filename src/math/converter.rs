//! External converter invocation.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

/// Default converter program.
pub const DEFAULT_PROGRAM: &str = "blahtexml";

/// Default converter arguments.
pub const DEFAULT_ARGS: &[&str] = &["--mathml"];

/// Output captured from one converter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConverterOutput {
    pub success: bool,
    /// Exit code, None when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Converts LaTeX source by running an external tool.
///
/// Returns `Err` only when the tool could not be started or waited on.
/// A tool that runs and fails reports it through [`ConverterOutput`].
pub trait Converter {
    fn convert(&self, latex: &str) -> io::Result<ConverterOutput>;

    /// Name used in diagnostics.
    fn program(&self) -> &str;
}

/// Runs `blahtexml` (or a compatible program) as a one-shot process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlahtexCommand {
    program: String,
    args: Vec<String>,
}

impl BlahtexCommand {
    /// Creates command for given program and argument list.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for BlahtexCommand {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_ARGS.iter().copied())
    }
}

impl Converter for BlahtexCommand {
    /// Pipes the LaTeX source, newline terminated, into the program and
    /// waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns error if the program cannot be spawned or waited on
    fn convert(&self, latex: &str) -> io::Result<ConverterOutput> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdin = child.stdin.take();
        let input = format!("{}\n", latex);

        // Stdin is written on its own thread while both output pipes drain
        let output = thread::scope(|scope| {
            let writer = scope.spawn(move || -> io::Result<()> {
                if let Some(mut stdin) = stdin {
                    // Program may exit before reading its input; the exit status decides
                    match stdin.write_all(input.as_bytes()) {
                        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                        _ => {}
                    }
                }
                Ok(())
            });

            let output = child.wait_with_output()?;
            writer
                .join()
                .map_err(|_| io::Error::other("converter stdin writer panicked"))??;
            Ok::<_, io::Error>(output)
        })?;

        Ok(ConverterOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn program(&self) -> &str {
        &self.program
    }
}
